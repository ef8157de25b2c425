use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcast topic with bounded capacity.
/// `T` must be `Send + Sync` because we hop across threads.
///
/// Slow subscribers lose the oldest messages first, which suits drive
/// commands: only the newest one matters.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(capacity: usize) -> Self {
        // broadcast::channel panics on zero capacity
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes `msg` and returns how many subscribers will see it.
    pub fn publish(&self, msg: T) -> usize {
        match self.tx.send(Arc::new(msg)) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!("message dropped, topic has no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simbot_kinematics::DriveCommand;

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let topic: Topic<DriveCommand> = Topic::new(4);
        assert_eq!(topic.publish(DriveCommand::STOP), 0);
    }

    #[test]
    fn test_subscriber_receives_in_order() {
        let topic = Topic::new(4);
        let mut rx = topic.subscribe();
        topic.publish(DriveCommand::new(0.6, 0.6));
        topic.publish(DriveCommand::new(0.4, -0.4));
        assert_eq!(*rx.try_recv().unwrap(), DriveCommand::new(0.6, 0.6));
        assert_eq!(*rx.try_recv().unwrap(), DriveCommand::new(0.4, -0.4));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_slow_subscriber_lags_and_keeps_newest() {
        let topic = Topic::new(2);
        let mut rx = topic.subscribe();
        for i in 0..5 {
            topic.publish(DriveCommand::new(f64::from(i) / 10.0, 0.0));
        }
        assert!(matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Lagged(3))));
        assert_eq!(*rx.try_recv().unwrap(), DriveCommand::new(0.3, 0.0));
        assert_eq!(*rx.try_recv().unwrap(), DriveCommand::new(0.4, 0.0));
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let topic = Topic::new(0);
        let mut rx = topic.subscribe();
        assert_eq!(topic.publish(DriveCommand::STOP), 1);
        assert_eq!(*rx.try_recv().unwrap(), DriveCommand::STOP);
    }
}
