use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcapFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error ({context}): {message}")]
    Format {
        context: &'static str,
        message: String,
    },
}
