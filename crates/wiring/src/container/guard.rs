//! RAII guard tracking the addresses currently being resolved

use std::thread::{self, ThreadId};

use dashmap::DashMap;

use super::Container;
use crate::error::{ContainerError, Result};

/// RAII guard that pops an address off the active resolution path when dropped.
///
/// Every nested `get` through a container holds one, so the path length is
/// the current resolution depth and the path itself is the chain reported
/// when a definition asks for its own value. Paths are kept per thread.
pub(crate) struct ResolutionGuard<'a> {
    active: &'a DashMap<ThreadId, Vec<String>>,
    thread: ThreadId,
}

impl Container {
    /// Push `address` onto this thread's active path. Fails if the depth
    /// limit is reached.
    pub(crate) fn enter(&self, address: &str) -> Result<ResolutionGuard<'_>> {
        let thread = thread::current().id();
        let max = self.inner.config.max_depth;

        let mut path = self.inner.active.entry(thread).or_default();
        if path.len() >= max {
            tracing::debug!(address, depth = path.len(), max, "Resolution depth exceeded");
            return Err(ContainerError::DepthExceeded {
                depth: path.len(),
                max,
            });
        }
        path.push(address.to_string());

        Ok(ResolutionGuard {
            active: &self.inner.active,
            thread,
        })
    }

    /// Current nesting of `get` calls through this container on this thread.
    pub fn depth(&self) -> usize {
        self.inner
            .active
            .get(&thread::current().id())
            .map_or(0, |path| path.len())
    }

    /// This thread's active path from the first occurrence of `address` to the top.
    pub(crate) fn active_chain(&self, address: &str) -> Vec<String> {
        match self.inner.active.get(&thread::current().id()) {
            Some(path) => {
                let start = path.iter().position(|a| a == address).unwrap_or(0);
                path[start..].to_vec()
            }
            None => vec![address.to_string()],
        }
    }
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        if let Some(mut path) = self.active.get_mut(&self.thread) {
            path.pop();
        }
        self.active.remove_if(&self.thread, |_, path| path.is_empty());
    }
}
