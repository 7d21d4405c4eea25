//! `$x` variables: single-character keys bound to track record fields.

use std::borrow::Cow;

use crate::library::{Track, UNKNOWN};

use super::render::Surface;

/// Every variable key with the name shown in prompts and help.
pub const VARIABLES: [(char, &str); 16] = [
    ('a', "Artist"),
    ('A', "Album Artist"),
    ('t', "Title"),
    ('b', "Album"),
    ('p', "Performer"),
    ('c', "Composer"),
    ('y', "Date"),
    ('g', "Genre"),
    ('f', "File name"),
    ('F', "File path"),
    ('i', "Id"),
    ('n', "Track number"),
    ('N', "Times played"),
    ('l', "Length"),
    ('B', "Bitrate"),
    ('S', "Samplerate"),
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StrField {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Performer,
    Composer,
    Date,
    Genre,
    FileName,
    Url,
}

impl StrField {
    fn get(self, track: &Track) -> &str {
        match self {
            StrField::Title => &track.title,
            StrField::Artist => &track.artist,
            StrField::Album => &track.album,
            StrField::AlbumArtist => &track.album_artist,
            StrField::Performer => &track.performer,
            StrField::Composer => &track.composer,
            StrField::Date => &track.date,
            StrField::Genre => &track.genre,
            StrField::FileName => &track.file_name,
            StrField::Url => &track.url,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IntField {
    Id,
    TrackNumber,
    TimesPlayed,
}

impl IntField {
    fn get(self, track: &Track) -> i32 {
        match self {
            IntField::Id => track.id,
            IntField::TrackNumber => track.track_number,
            IntField::TimesPlayed => track.times_played,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComputedField {
    Duration,
    Bitrate,
    Samplerate,
}

impl ComputedField {
    /// The raw field the value is computed from; negative when unknown.
    fn source(self, track: &Track) -> i32 {
        match self {
            ComputedField::Duration => track.duration,
            ComputedField::Bitrate => track.bitrate,
            ComputedField::Samplerate => track.samplerate,
        }
    }

    fn generate(self, track: &Track) -> String {
        match self {
            ComputedField::Duration => format_duration(track.duration),
            ComputedField::Bitrate if track.bitrate >= 0 => {
                format!("{}kbps", track.bitrate / 1000)
            }
            ComputedField::Samplerate if track.samplerate >= 0 => {
                format!("{}Hz", track.samplerate)
            }
            ComputedField::Bitrate | ComputedField::Samplerate => String::new(),
        }
    }
}

/// Format a length in milliseconds as `M:SS`, or `H:MM:SS` from one hour on.
/// Unknown (negative) lengths format as an empty string.
pub fn format_duration(ms: i32) -> String {
    if ms < 0 {
        return String::new();
    }
    let secs = ms / 1000;
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// A resolved `$x` binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Variable {
    Str(StrField),
    Int(IntField),
    Computed(ComputedField),
}

impl Variable {
    pub fn from_key(key: char) -> Option<Self> {
        let var = match key {
            'a' => Variable::Str(StrField::Artist),
            'A' => Variable::Str(StrField::AlbumArtist),
            't' => Variable::Str(StrField::Title),
            'b' => Variable::Str(StrField::Album),
            'p' => Variable::Str(StrField::Performer),
            'c' => Variable::Str(StrField::Composer),
            'y' => Variable::Str(StrField::Date),
            'g' => Variable::Str(StrField::Genre),
            'f' => Variable::Str(StrField::FileName),
            'F' => Variable::Str(StrField::Url),
            'i' => Variable::Int(IntField::Id),
            'n' => Variable::Int(IntField::TrackNumber),
            'N' => Variable::Int(IntField::TimesPlayed),
            'l' => Variable::Computed(ComputedField::Duration),
            'B' => Variable::Computed(ComputedField::Bitrate),
            'S' => Variable::Computed(ComputedField::Samplerate),
            _ => return None,
        };
        Some(var)
    }

    pub fn is_empty(&self, track: &Track) -> bool {
        match *self {
            Variable::Str(f) => f.get(track).is_empty(),
            Variable::Int(f) => f.get(track) == UNKNOWN,
            Variable::Computed(f) => f.source(track) < 0,
        }
    }

    /// Width of the rendered value in code points.
    pub fn size(&self, track: &Track) -> usize {
        match *self {
            Variable::Int(f) if f.get(track) == UNKNOWN => 0,
            _ => self.text(track).chars().count(),
        }
    }

    /// The rendered value as plain text.
    pub fn text<'a>(&self, track: &'a Track) -> Cow<'a, str> {
        match *self {
            Variable::Str(f) => Cow::Borrowed(f.get(track)),
            Variable::Int(f) => match f.get(track) {
                UNKNOWN => Cow::Borrowed(""),
                v => Cow::Owned(v.to_string()),
            },
            Variable::Computed(f) => Cow::Owned(f.generate(track)),
        }
    }

    /// Write at most `max_width` code points of the value to `surface`.
    /// Returns how many were written.
    pub fn render(&self, track: &Track, surface: &mut dyn Surface, max_width: usize) -> usize {
        let text = self.text(track);
        match text.char_indices().nth(max_width) {
            Some((cut, _)) => {
                surface.print_str(&text[..cut]);
                max_width
            }
            None => {
                surface.print_str(&text);
                text.chars().count()
            }
        }
    }
}
