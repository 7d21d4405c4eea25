/// Value stored in integer fields whose value is not known.
pub const UNKNOWN: i32 = -1;

/// A song record as supplied to the display format engine.
///
/// Integer fields use [`UNKNOWN`] when the value is missing; string fields
/// are empty instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: i32,
    /// Length in milliseconds.
    pub duration: i32,
    pub track_number: i32,
    pub times_played: i32,
    /// Bits per second.
    pub bitrate: i32,
    /// Hz.
    pub samplerate: i32,

    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    pub performer: String,
    pub composer: String,
    pub date: String,
    pub genre: String,
    pub file_name: String,
    pub url: String,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            id: UNKNOWN,
            duration: UNKNOWN,
            track_number: UNKNOWN,
            times_played: UNKNOWN,
            bitrate: UNKNOWN,
            samplerate: UNKNOWN,
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            album_artist: String::new(),
            performer: String::new(),
            composer: String::new(),
            date: String::new(),
            genre: String::new(),
            file_name: String::new(),
            url: String::new(),
        }
    }
}
