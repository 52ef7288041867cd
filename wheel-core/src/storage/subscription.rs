use crate::error::Result;
use crate::storage::{Storage, Topic};
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Live view over a part of the store.
///
/// Values arrive in commit order. Dropping the handle (or calling
/// [`Subscription::cancel`]) stops the producer.
pub struct Subscription<T> {
    rx: mpsc::Receiver<Result<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> Subscription<T> {
    /// A subscription fed by hand through the returned sender.
    pub fn channel(buffer: usize) -> (mpsc::Sender<Result<T>>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { rx, task: None })
    }

    fn with_task(mut self, task: JoinHandle<()>) -> Self {
        self.task = Some(task);
        self
    }

    /// Next value, or `None` once the producer has stopped.
    pub async fn next(&mut self) -> Option<Result<T>> {
        self.rx.recv().await
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

pub(crate) type Loader<T> = Box<dyn Fn(Arc<Storage>) -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Spawns a producer that emits `load` once, then again after every change
/// to `topic`. Changes seen only through `data_version` polling are emitted
/// when the loaded value actually differs from the last one sent.
pub(crate) fn watch<T>(storage: Arc<Storage>, topic: Topic, load: Loader<T>) -> Subscription<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let mut changes = storage.changes();
    let (tx, subscription) = Subscription::channel(16);

    let task = tokio::spawn(async move {
        let mut version = storage.data_version().await.ok();
        let mut last: Option<T> = None;
        let mut ticker = tokio::time::interval(storage.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        let mut forced = true;
        loop {
            let delivered = match load(storage.clone()).await {
                Ok(value) if forced || last.as_ref() != Some(&value) => {
                    last = Some(value.clone());
                    tx.send(Ok(value)).await.is_ok()
                }
                Ok(_) => true,
                Err(e) => tx.send(Err(e)).await.is_ok(),
            };

            if !delivered {
                tracing::debug!("Subscriber for {:?} went away", topic);
                return;
            }

            forced = loop {
                tokio::select! {
                    changed = changes.recv() => match changed {
                        Ok(changed) if changed == topic => break true,
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!("{:?} watcher lagged by {} changes", topic, skipped);
                            break true;
                        }
                        Err(RecvError::Closed) => return,
                    },
                    _ = ticker.tick() => match storage.data_version().await {
                        Ok(current) if Some(current) != version => {
                            version = Some(current);
                            break false;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            if tx.send(Err(e)).await.is_err() {
                                return;
                            }
                        }
                    },
                }
            };
        }
    });

    subscription.with_task(task)
}
