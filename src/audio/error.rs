use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio output device error: {0}")]
    DeviceError(#[from] rodio::StreamError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Preview request failed with status {0}")]
    HttpStatus(u16),

    #[error("Decoding error: {0}")]
    DecodingError(#[from] rodio::decoder::DecoderError),
}
