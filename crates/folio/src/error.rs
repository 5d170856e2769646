/// Transport and payload failures for a single fetch cycle.
///
/// Errors are terminal for the cycle that produced them; the next state
/// change always starts a clean fetch.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog API error [{0}]: {1}")]
    Status(u16, String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}
