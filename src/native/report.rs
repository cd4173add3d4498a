use std::fs::File;
use std::io::{BufReader, Write};

use const_format::concatcp;
use mp4::{FtypBox, Mp4Box, Mp4Reader, Mp4Track, TrackType};

use super::Failure;

const UNKNOWN: &str = "unknown";
const INFO_HEADER: &str = concatcp!("Track", '\t', "Type", '\t', "Info", '\n');
const INDENT: usize = 2;

/// Describe all tracks, or only the requested one.
pub(super) fn info(
    reader: &Mp4Reader<BufReader<File>>,
    track_id: Option<u32>,
) -> Option<String> {
    match track_id.filter(|track_id| *track_id != 0) {
        Some(track_id) => reader.tracks().get(&track_id).map(describe),
        None => {
            let mut track_ids: Vec<_> = reader.tracks().keys().copied().collect();
            track_ids.sort_unstable();

            let mut info = String::from(INFO_HEADER);
            for track_id in track_ids {
                if let Some(track) = reader.tracks().get(&track_id) {
                    info.push_str(&describe(track));
                }
            }
            Some(info)
        }
    }
}

/// A freshly created file has no tracks yet.
pub(super) fn info_empty(track_id: Option<u32>) -> Option<String> {
    match track_id.filter(|track_id| *track_id != 0) {
        Some(_) => None,
        None => Some(String::from(INFO_HEADER)),
    }
}

fn describe(track: &Mp4Track) -> String {
    let kind = track.track_type().ok();
    let codec = match (track.media_type(), track.box_type()) {
        (Ok(media_type), _) => media_type.to_string().to_uppercase(),
        (Err(_), Ok(box_type)) => box_type.to_string(),
        _ => String::from(UNKNOWN),
    };

    // Durations and rates divide by the media timescale.
    let (seconds, kbps, fps) = match track.timescale() {
        0 => (0.0, 0, 0.0),
        _ => (
            track.duration().as_secs_f64(),
            track.bitrate() / 1000,
            track.frame_rate(),
        ),
    };

    let description = match kind {
        Some(TrackType::Video) => format!(
            "{}, {:.3} secs, {} kbps, {}x{} @ {:.6} fps",
            codec,
            seconds,
            kbps,
            track.width(),
            track.height(),
            fps
        ),
        Some(TrackType::Audio) => format!(
            "{}, {:.3} secs, {} kbps, {} Hz",
            codec,
            seconds,
            kbps,
            track.timescale()
        ),
        _ => format!("{}, {:.3} secs", codec, seconds),
    };

    format!(
        "{}\t{}\t{}\n",
        track.track_id(),
        kind.map(|kind| kind.to_string().to_lowercase())
            .unwrap_or_else(|| String::from(UNKNOWN)),
        description
    )
}

fn entry<M: Mp4Box>(sink: &mut dyn Write, depth: usize, node: &M) -> Result<(), Failure> {
    writeln!(
        sink,
        "{:indent$}{} size={} {}",
        "",
        node.box_type(),
        node.box_size(),
        node.summary()?,
        indent = depth * INDENT
    )?;
    Ok(())
}

/// Write the box tree of a parsed container.
pub(super) fn dump_reader(
    reader: &Mp4Reader<BufReader<File>>,
    include_implicit: bool,
    sink: &mut dyn Write,
) -> Result<(), Failure> {
    entry(sink, 0, &reader.ftyp)?;
    entry(sink, 0, &reader.moov)?;
    entry(sink, 1, &reader.moov.mvhd)?;

    for trak in &reader.moov.traks {
        entry(sink, 1, trak)?;
        entry(sink, 2, &trak.tkhd)?;
        if let Some(edts) = &trak.edts {
            entry(sink, 2, edts)?;
        }

        let mdia = &trak.mdia;
        entry(sink, 2, mdia)?;
        entry(sink, 3, &mdia.mdhd)?;
        entry(sink, 3, &mdia.hdlr)?;

        let minf = &mdia.minf;
        entry(sink, 3, minf)?;
        if let Some(vmhd) = &minf.vmhd {
            entry(sink, 4, vmhd)?;
        }
        if let Some(smhd) = &minf.smhd {
            entry(sink, 4, smhd)?;
        }

        let stbl = &minf.stbl;
        entry(sink, 4, stbl)?;
        entry(sink, 5, &stbl.stsd)?;
        if let Some(avc1) = &stbl.stsd.avc1 {
            entry(sink, 6, avc1)?;
        }
        if let Some(hev1) = &stbl.stsd.hev1 {
            entry(sink, 6, hev1)?;
        }
        if let Some(mp4a) = &stbl.stsd.mp4a {
            entry(sink, 6, mp4a)?;
        }
        if let Some(tx3g) = &stbl.stsd.tx3g {
            entry(sink, 6, tx3g)?;
        }

        if include_implicit {
            entry(sink, 5, &stbl.stts)?;
            if let Some(ctts) = &stbl.ctts {
                entry(sink, 5, ctts)?;
            }
            if let Some(stss) = &stbl.stss {
                entry(sink, 5, stss)?;
            }
            entry(sink, 5, &stbl.stsc)?;
            entry(sink, 5, &stbl.stsz)?;
            if let Some(stco) = &stbl.stco {
                entry(sink, 5, stco)?;
            }
            if let Some(co64) = &stbl.co64 {
                entry(sink, 5, co64)?;
            }
        }
    }

    for moof in &reader.moofs {
        entry(sink, 0, moof)?;
    }
    Ok(())
}

/// Only the file type is known until a created file is closed.
pub(super) fn dump_created(ftyp: &FtypBox, sink: &mut dyn Write) -> Result<(), Failure> {
    entry(sink, 0, ftyp)
}
