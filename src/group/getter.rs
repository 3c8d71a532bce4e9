//! Loader Callbacks
//!
//! A [`Getter`] produces the bytes for a key on a cache miss, typically by
//! reading a slower backing store. Any async closure taking the key as a
//! `String` can be used through [`GetterFn`].

use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;

#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
}

/// Adapts an async closure into a [`Getter`].
pub struct GetterFn<F>(pub F);

#[async_trait]
impl<F, Fut> Getter for GetterFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key.to_string()).await
    }
}
