// file: src/repository/mod.rs
// description: Repository operations module exports
// reference: Internal module structure

pub mod enumerator;
pub mod remote;
pub mod sync;

pub use enumerator::FileEnumerator;
pub use remote::CredentialedRemote;
pub use sync::{MirrorState, RepositorySynchronizer};
