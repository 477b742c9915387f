use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::audio::error::AudioError;

pub fn construct_sink() -> Result<(OutputStream, Sink), AudioError> {
    let stream = OutputStreamBuilder::open_default_stream()?;
    let sink = Sink::connect_new(stream.mixer());
    sink.pause();

    Ok((stream, sink))
}
