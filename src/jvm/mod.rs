pub mod discovery;
pub mod emitter;
pub mod filter;
pub mod introspection;
pub mod jdk_tools;
#[cfg(feature = "jolokia")]
pub mod jolokia;
pub mod types;
pub mod watcher;

#[cfg(test)]
pub(crate) mod testing;
