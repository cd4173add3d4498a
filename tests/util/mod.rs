use std::fs::File;
use std::io::{BufWriter, Result as IoResult, Seek, Write};
use std::path::{Path, PathBuf};

use mp4::{
    AacConfig, AvcConfig, Bytes, FourCC, MediaConfig, Mp4Config, Mp4Sample, Mp4Writer,
    TrackConfig, TrackType, TtxtConfig,
};

pub const SAMPLE_WIDTH: u16 = 320;
pub const SAMPLE_HEIGHT: u16 = 240;
pub const AUDIO_SAMPLE_RATE: u32 = 48000;
pub const AUDIO_BITRATE: u32 = 128_000;

const SEQUENCE_PARAMETER_SET: [u8; 26] = [
    0x67, 0x64, 0x00, 0x1f, 0xac, 0xd9, 0x40, 0x50, 0x05, 0xbb, 0x01, 0x10, 0x00, 0x00, 0x03,
    0x00, 0x10, 0x00, 0x00, 0x03, 0x03, 0xc0, 0xf1, 0x83, 0x19, 0x60,
];
const PICTURE_PARAMETER_SET: [u8; 6] = [0x68, 0xeb, 0xe3, 0xcb, 0x22, 0xc0];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config() -> Mp4Config {
    Mp4Config {
        major_brand: FourCC { value: *b"isom" },
        minor_version: 512,
        compatible_brands: vec![
            FourCC { value: *b"isom" },
            FourCC { value: *b"iso2" },
            FourCC { value: *b"avc1" },
            FourCC { value: *b"mp41" },
        ],
        timescale: 1000,
    }
}

fn video_track() -> TrackConfig {
    TrackConfig {
        track_type: TrackType::Video,
        timescale: 1000,
        language: String::from("und"),
        media_conf: MediaConfig::AvcConfig(AvcConfig {
            width: SAMPLE_WIDTH,
            height: SAMPLE_HEIGHT,
            seq_param_set: SEQUENCE_PARAMETER_SET.to_vec(),
            pic_param_set: PICTURE_PARAMETER_SET.to_vec(),
        }),
    }
}

fn write_video_samples<W: Write + Seek>(
    writer: &mut Mp4Writer<W>,
    track_id: u32,
) -> mp4::Result<()> {
    for index in 0..25u64 {
        writer.write_sample(
            track_id,
            &Mp4Sample {
                start_time: index * 40,
                duration: 40,
                rendering_offset: 0,
                is_sync: index == 0,
                bytes: Bytes::from_static(&[0x00, 0x00, 0x00, 0x02, 0x09, 0x10]),
            },
        )?;
    }
    Ok(())
}

/// Write a container with a single H.264 track of 25 one-frame samples (one second).
pub fn write_sample<P: AsRef<Path>>(path: P) -> mp4::Result<PathBuf> {
    let file = File::create(path.as_ref())?;
    let mut writer = Mp4Writer::write_start(BufWriter::new(file), &config())?;
    writer.add_track(&video_track())?;
    write_video_samples(&mut writer, 1)?;
    writer.write_end()?;
    writer.into_writer().flush()?;

    Ok(path.as_ref().to_path_buf())
}

/// Write a container with an H.264 track (1), an AAC track (2) and a timed text track (3).
pub fn write_multi_track<P: AsRef<Path>>(path: P) -> mp4::Result<PathBuf> {
    let file = File::create(path.as_ref())?;
    let mut writer = Mp4Writer::write_start(BufWriter::new(file), &config())?;
    writer.add_track(&video_track())?;
    writer.add_track(&TrackConfig {
        track_type: TrackType::Audio,
        timescale: AUDIO_SAMPLE_RATE,
        language: String::from("und"),
        media_conf: MediaConfig::AacConfig(AacConfig {
            bitrate: AUDIO_BITRATE,
            ..AacConfig::default()
        }),
    })?;
    writer.add_track(&TrackConfig {
        track_type: TrackType::Subtitle,
        timescale: 1000,
        language: String::from("und"),
        media_conf: MediaConfig::TtxtConfig(TtxtConfig::default()),
    })?;

    write_video_samples(&mut writer, 1)?;
    for index in 0..47u64 {
        writer.write_sample(
            2,
            &Mp4Sample {
                start_time: index * 1024,
                duration: 1024,
                rendering_offset: 0,
                is_sync: true,
                bytes: Bytes::from_static(&[0x21, 0x10, 0x04, 0x60, 0x8c, 0x1c]),
            },
        )?;
    }
    writer.write_sample(
        3,
        &Mp4Sample {
            start_time: 0,
            duration: 1000,
            rendering_offset: 0,
            is_sync: true,
            bytes: Bytes::from_static(&[0x00, 0x02, b'h', b'i']),
        },
    )?;
    writer.write_end()?;
    writer.into_writer().flush()?;

    Ok(path.as_ref().to_path_buf())
}

/// Write a file which is clearly not an MP4 container.
pub fn write_garbage<P: AsRef<Path>>(path: P) -> IoResult<PathBuf> {
    let mut file = File::create(path.as_ref())?;
    file.write_all(b"This is plain text and no ISO base media file.")?;
    Ok(path.as_ref().to_path_buf())
}
