use super::*;
use super::section::resolve_tokens;
use super::types::Token;
use super::variable::{ComputedField, IntField, StrField, Variable, format_duration};
use crate::library::UNKNOWN;

/// Records one row of output, one cell per code point.
struct LineSurface {
    cells: Vec<char>,
    colors: Vec<Option<Color>>,
    x: usize,
    color: Option<Color>,
    color_changes: usize,
}

impl LineSurface {
    fn new(width: usize) -> Self {
        Self {
            cells: vec![' '; width],
            colors: vec![None; width],
            x: 0,
            color: None,
            color_changes: 0,
        }
    }

    fn text(&self) -> String {
        self.cells.iter().collect::<String>().trim_end().to_string()
    }
}

impl Surface for LineSurface {
    fn move_to(&mut self, x: u16, _y: u16) {
        self.x = x as usize;
    }

    fn print_char(&mut self, ch: char) {
        if self.x < self.cells.len() {
            self.cells[self.x] = ch;
            self.colors[self.x] = self.color;
        }
        self.x += 1;
    }

    fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
        self.color_changes += 1;
    }
}

fn song(artist: &str, title: &str) -> Track {
    Track {
        artist: artist.into(),
        title: title.into(),
        ..Track::default()
    }
}

fn render(template: &str, track: &Track, width: u16) -> String {
    let mut format = SongFormat::parse(template).unwrap();
    let mut surface = LineSurface::new(width as usize);
    format
        .paint(track, &mut surface, Rect::new(0, 0, width, 1), false)
        .unwrap();
    surface.text()
}

#[test]
fn single_variable_section_depends_on_field() {
    let format = SongFormat::parse("[l:0:20]{$b}").unwrap();
    let tokens = &format.columns()[0].tokens;

    assert!(resolve_tokens(tokens, &Track::default()).is_empty());

    let track = Track {
        album: "Album".into(),
        ..Track::default()
    };
    assert_eq!(
        resolve_tokens(tokens, &track),
        vec![&Token::Variable(Variable::Str(StrField::Album))]
    );
}

#[test]
fn alternation_picks_first_satisfied_section() {
    let format = SongFormat::parse("[l:0:20]{$a}|{$b}|{$c}").unwrap();
    let tokens = &format.columns()[0].tokens;
    let track = Track {
        album: "Album".into(),
        ..Track::default()
    };

    assert_eq!(
        resolve_tokens(tokens, &track),
        vec![&Token::Variable(Variable::Str(StrField::Album))]
    );

    let nothing_set = Track::default();
    assert!(resolve_tokens(tokens, &nothing_set).is_empty());
}

#[test]
fn section_without_variables_is_always_shown() {
    let format = SongFormat::parse("[l:0:20]{--}|{$t}").unwrap();
    assert_eq!(format.formatted_string(&song("", "Song"), 0), "--");
}

#[test]
fn section_needs_every_variable() {
    let format = SongFormat::parse("[l:0:20]<{$a:$t}>").unwrap();
    assert_eq!(format.formatted_string(&song("A", "T"), 0), "<A:T>");
    assert_eq!(format.formatted_string(&song("A", ""), 0), "<>");
}

#[test]
fn unknown_variable_position_is_exact() {
    assert_eq!(
        SongFormat::parse("[l:0:5]$z").unwrap_err(),
        FormatError::UnknownVariable { ch: 'z', pos: 8 }
    );
}

#[test]
fn unbalanced_braces_are_rejected() {
    assert_eq!(
        SongFormat::parse("[l:0:5]{$a").unwrap_err(),
        FormatError::UnbalancedBraces { ch: '{', pos: 7 }
    );
    assert_eq!(
        SongFormat::parse("[l:0:5]{$a}}").unwrap_err(),
        FormatError::UnbalancedBraces { ch: '}', pos: 11 }
    );
    assert_eq!(
        SongFormat::parse("[l:0:5]{$a}}").unwrap_err().to_string(),
        "Unbalanced braces. ('}' at position 11)"
    );
}

#[test]
fn escaped_dollar_renders_literally() {
    assert_eq!(render("[l:0:5]\\$", &Track::default(), 5), "$");
}

#[test]
fn duration_crosses_into_hours_at_one_hour() {
    assert_eq!(format_duration(3_599_000), "59:59");
    assert_eq!(format_duration(3_600_000), "1:00:00");
    assert_eq!(format_duration(185_000), "3:05");
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(UNKNOWN), "");
}

#[test]
fn artist_title_falls_back_to_title() {
    let template = "[l:1:0]{$a - $t}|{$t}";
    assert_eq!(render(template, &song("Artist", "Song"), 30), "Artist - Song");
    assert_eq!(render(template, &song("", "Song"), 30), "Song");
    assert_eq!(render(template, &song("Artist", "Song"), 8), "Artist -");
}

#[test]
fn matching_ignores_literal_characters() {
    let format = SongFormat::parse("[l:1:0]{$a - $t}|{$t}").unwrap();
    let track = song("Artist", "Song");

    assert_eq!(format.formatted_string(&track, 0), "Artist - Song");
    assert!(!format.match_formatted_string(&track, &Regex::new("-").unwrap()));
    assert!(format.match_formatted_string(&track, &Regex::new("^Son").unwrap()));
    assert!(format.match_formatted_string(&track, &Regex::new("tist$").unwrap()));
}

#[test]
fn matching_only_sees_resolved_sections() {
    let format = SongFormat::parse("[l:1:0]{$t}|{$f}").unwrap();
    let track = Track {
        title: "Song".into(),
        file_name: "file.mp3".into(),
        ..Track::default()
    };
    assert!(!format.match_formatted_string(&track, &Regex::new("mp3").unwrap()));
}

#[test]
fn default_format_paints_both_columns() {
    let track = Track {
        duration: 185_000,
        ..song("A", "T")
    };
    let expected = format!("{:<20}{:>10}", "A - T", "(3:05)");
    assert_eq!(render(DEFAULT_DISPLAY_FORMAT, &track, 30), expected);

    let untagged = Track {
        file_name: "track01.flac".into(),
        ..Track::default()
    };
    assert_eq!(render(DEFAULT_DISPLAY_FORMAT, &untagged, 30), "track01.flac");
}

#[test]
fn right_and_center_alignment_shift_content() {
    let track = song("", "abc");
    assert_eq!(render("[r:0:10]$t", &track, 10), "       abc");
    assert_eq!(render("[c:0:9]$t", &track, 9), "   abc");
    // Content wider than the column is left aligned and truncated.
    assert_eq!(render("[r:0:2]$t", &track, 2), "ab");
}

#[test]
fn truncation_never_splits_code_points() {
    let track = song("", "ñandú!");
    assert_eq!(render("[l:0:4]$t", &track, 4), "ñand");

    let format = SongFormat::parse("[l:0:4]$t").unwrap();
    assert_eq!(format.calculate_content_size(&track, 0), 6);
}

#[test]
fn colors_follow_directives_unless_ignored() {
    let mut format = SongFormat::parse("[l:0:6]ab%2ccd").unwrap();
    let line = Rect::new(0, 0, 6, 1);

    let mut surface = LineSurface::new(6);
    format
        .paint(&Track::default(), &mut surface, line, false)
        .unwrap();
    assert_eq!(surface.text(), "abcd");
    assert_eq!(surface.colors[..4], [None, None, Some(Color::Red), Some(Color::Red)]);

    let mut plain = LineSurface::new(6);
    format.paint(&Track::default(), &mut plain, line, true).unwrap();
    assert_eq!(plain.text(), "abcd");
    assert_eq!(plain.color_changes, 0);
}

#[test]
fn each_column_starts_in_default_color() {
    let mut format = SongFormat::parse("[l:0:2]%5cx[l:0:2]y").unwrap();
    let mut surface = LineSurface::new(4);
    format
        .paint(&Track::default(), &mut surface, Rect::new(0, 0, 4, 1), false)
        .unwrap();
    assert_eq!(surface.colors[0], Some(Color::Blue));
    assert_eq!(surface.colors[2], None);
}

#[test]
fn paint_reports_terminal_too_small() {
    let mut format = SongFormat::parse("[l:0:10]$t[l:1:0]$a").unwrap();
    let mut surface = LineSurface::new(13);
    let err = format
        .paint(&Track::default(), &mut surface, Rect::new(0, 0, 13, 1), false)
        .unwrap_err();
    assert_eq!(err.to_string(), "Terminal too small!");
}

#[test]
fn integer_and_computed_variables() {
    let track = Track {
        id: 42,
        track_number: 7,
        bitrate: 320_000,
        samplerate: 44_100,
        ..Track::default()
    };

    let id = Variable::from_key('i').unwrap();
    assert_eq!(id, Variable::Int(IntField::Id));
    assert_eq!(id.text(&track), "42");
    assert_eq!(id.size(&track), 2);

    let played = Variable::from_key('N').unwrap();
    assert!(played.is_empty(&track));
    assert_eq!(played.size(&track), 0);
    assert_eq!(played.text(&track), "");

    let bitrate = Variable::from_key('B').unwrap();
    assert_eq!(bitrate, Variable::Computed(ComputedField::Bitrate));
    assert_eq!(bitrate.text(&track), "320kbps");
    assert_eq!(Variable::from_key('S').unwrap().text(&track), "44100Hz");
    assert!(Variable::from_key('l').unwrap().is_empty(&track));

    assert_eq!(render("[l:0:20]$n. {$i}|{x}", &track, 20), "7. 42");
}

#[test]
fn every_named_variable_resolves() {
    for (key, name) in VARIABLES {
        assert!(Variable::from_key(key).is_some(), "{key} ({name})");
    }
    assert_eq!(VARIABLES.len(), 16);
    assert!(Variable::from_key('z').is_none());
}

#[test]
fn rejected_format_keeps_the_previous_one() {
    let mut format = SongFormat::parse(DEFAULT_DISPLAY_FORMAT).unwrap();
    let before = format.clone();

    assert!(format.set_display_format("[l:0:5]{$a").is_err());
    assert_eq!(format, before);
    assert_eq!(format.template(), DEFAULT_DISPLAY_FORMAT);

    format.set_display_format("[l:0:5]$t").unwrap();
    assert_eq!(format.template(), "[l:0:5]$t");
    assert_eq!(format.columns().len(), 1);
}

#[test]
fn formatted_string_per_column() {
    let format: SongFormat = DEFAULT_DISPLAY_FORMAT.parse().unwrap();
    let track = Track {
        duration: 3_600_000,
        ..song("Artist", "Song")
    };
    assert_eq!(format.formatted_string(&track, 0), "Artist - Song");
    assert_eq!(format.formatted_string(&track, 1), "(1:00:00)");
    assert_eq!(format.formatted_string(&track, 2), "");
    assert_eq!(format.calculate_content_size(&track, 1), 9);
}

#[test]
fn empty_format_renders_nothing() {
    let mut format = SongFormat::default();
    let mut surface = LineSurface::new(10);
    format
        .paint(&song("A", "T"), &mut surface, Rect::new(0, 0, 10, 1), false)
        .unwrap();
    assert_eq!(surface.text(), "");
    assert!(!format.match_formatted_string(&song("A", "T"), &Regex::new(".").unwrap()));
}

#[test]
fn computed_emptiness_follows_the_sentinel() {
    let known = Track {
        duration: 0,
        bitrate: 0,
        samplerate: 0,
        ..Track::default()
    };
    for key in ['l', 'B', 'S'] {
        let var = Variable::from_key(key).unwrap();
        assert!(var.is_empty(&Track::default()), "{key}");
        assert!(!var.is_empty(&known), "{key}");
        assert_eq!(var.is_empty(&known), var.text(&known).is_empty(), "{key}");
    }
}
