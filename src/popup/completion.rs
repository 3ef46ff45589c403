use tokio::sync::oneshot;
use tracing::warn;

/// Receiving half held by whoever is suspended on a popup.
pub type PopupWaiter<T> = oneshot::Receiver<T>;

/// Sending half of a single-resolution signal. The first `resolve` wins;
/// later calls are dropped and reported.
#[derive(Debug)]
pub struct Completion<T> {
    tx: Option<oneshot::Sender<T>>,
}

pub fn completion<T>() -> (Completion<T>, PopupWaiter<T>) {
    let (tx, rx) = oneshot::channel();
    (Completion { tx: Some(tx) }, rx)
}

impl<T> Completion<T> {
    pub fn resolve(&mut self, value: T) -> bool {
        match self.tx.take() {
            Some(tx) => {
                if tx.send(value).is_err() {
                    warn!("popup resolved after its waiter went away");
                }
                true
            }
            None => {
                warn!("popup resolved more than once; ignoring");
                false
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.tx.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_resolution_reaches_waiter() {
        let (mut done, waiter) = completion::<u32>();
        assert!(!done.is_resolved());

        assert!(done.resolve(7));
        assert!(done.is_resolved());
        assert_eq!(waiter.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn second_resolution_is_ignored() {
        let (mut done, waiter) = completion::<&str>();

        assert!(done.resolve("first"));
        assert!(!done.resolve("second"));
        assert_eq!(waiter.await.unwrap(), "first");
    }

    #[tokio::test]
    async fn dropped_completion_errors_the_waiter() {
        let (done, waiter) = completion::<u32>();
        drop(done);
        assert!(waiter.await.is_err());
    }

    #[test]
    fn resolving_without_waiter_still_counts() {
        let (mut done, waiter) = completion::<u32>();
        drop(waiter);
        assert!(done.resolve(1));
        assert!(!done.resolve(2));
    }
}
