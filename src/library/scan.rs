use std::path::Path;

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Track, UNKNOWN};

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Clamp an unsigned property into the record's `i32` range.
fn to_field(v: u64) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Build a record for `path`, filling whatever the tags and audio
/// properties provide. Untagged or unreadable files keep empty fields.
fn read_track(path: &Path, id: i32) -> Track {
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    let mut track = Track {
        id,
        file_name: path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        url: format!("file://{}", absolute.display()),
        ..Track::default()
    };

    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(e) => {
            tracing::debug!("no tags for {}: {}", path.display(), e);
            return track;
        }
    };

    let props = tagged.properties();
    track.duration = to_field(props.duration().as_millis() as u64);
    if let Some(kbps) = props.audio_bitrate() {
        track.bitrate = to_field(u64::from(kbps) * 1000);
    }
    if let Some(hz) = props.sample_rate() {
        track.samplerate = to_field(u64::from(hz));
    }

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        let text = |key: &ItemKey| {
            tag.get_string(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        track.title = text(&ItemKey::TrackTitle).unwrap_or_default();
        track.artist = text(&ItemKey::TrackArtist).unwrap_or_default();
        track.album = text(&ItemKey::AlbumTitle).unwrap_or_default();
        track.album_artist = text(&ItemKey::AlbumArtist).unwrap_or_default();
        track.performer = text(&ItemKey::Performer).unwrap_or_default();
        track.composer = text(&ItemKey::Composer).unwrap_or_default();
        track.genre = text(&ItemKey::Genre).unwrap_or_default();
        track.date = text(&ItemKey::RecordingDate)
            .or_else(|| text(&ItemKey::Year))
            .unwrap_or_default();
        // "3/12" style values carry the disc total after the slash.
        track.track_number = text(&ItemKey::TrackNumber)
            .and_then(|v| v.split('/').next().and_then(|n| n.trim().parse().ok()))
            .unwrap_or(UNKNOWN);
    }

    track
}

/// Scan `dir` for audio files and return one record per file, sorted by
/// path.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut paths: Vec<_> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && (settings.include_hidden || !is_hidden(path))
                && is_audio_file(path, settings)
        })
        .collect();

    paths.sort_by_key(|p| p.to_string_lossy().to_lowercase());

    let tracks: Vec<Track> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| read_track(path, to_field(i as u64 + 1)))
        .collect();

    tracing::info!("scanned {} tracks under {}", tracks.len(), dir.display());
    tracks
}
