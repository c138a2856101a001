use std::io::Cursor;

/// Encode a mono 16-bit WAV of `frames` silent samples.
pub fn wav_bytes(sample_rate: u32, frames: usize) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut buffer, spec).expect("create wav writer");
        for _ in 0..frames {
            writer.write_sample(0i16).expect("write wav sample");
        }
        writer.finalize().expect("finalize wav");
    }
    buffer.into_inner()
}
