use futures::future::BoxFuture;

/// Spawns fire-and-forget background work
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, future: BoxFuture<'static, ()>);
}
