use std::future::Future;
use tokio::sync::mpsc;

/// Run `task` once per item, each on its own tokio task, and collect every
/// result.
///
/// Results arrive through a channel sized to the item count, so no worker ever
/// blocks on send. The output is in completion order. A worker that panics
/// contributes nothing; its siblings are unaffected.
pub async fn scatter_gather<I, T, F, Fut>(items: Vec<I>, task: F) -> Vec<T>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }

    let (tx, mut rx) = mpsc::channel(n);
    for item in items {
        let tx = tx.clone();
        let task = task.clone();
        tokio::spawn(async move {
            let out = task(item).await;
            let _ = tx.send(out).await;
        });
    }
    drop(tx);

    let mut results = Vec::with_capacity(n);
    while let Some(out) = rx.recv().await {
        results.push(out);
    }
    results
}
