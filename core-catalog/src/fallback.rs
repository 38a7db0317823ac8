//! Seeded fallback catalog
//!
//! A small built-in track list substituted whenever the remote catalog is
//! unreachable, errors out, or answers with nothing playable. Selection
//! rules:
//!
//! - blank query: the first 10 seeded tracks
//! - otherwise: tracks whose title or artist contains the query,
//!   case-insensitively
//! - no matches: the first 5 seeded tracks, so the result list is never
//!   empty

use bridge_traits::audio::Track;

/// Number of seeded tracks returned for a blank query.
const BLANK_QUERY_TAKE: usize = 10;

/// Number of seeded tracks returned when nothing matches.
const NO_MATCH_TAKE: usize = 5;

fn seeded_tracks() -> Vec<Track> {
    vec![
        Track::new("1", "Blinding Lights", "The Weeknd", "https://cdn-preview.example.com/1.mp3"),
        Track::new("2", "Shape of You", "Ed Sheeran", "https://cdn-preview.example.com/2.mp3"),
        Track::new("3", "Bohemian Rhapsody", "Queen", "https://cdn-preview.example.com/3.mp3"),
        Track::new("4", "Imagine", "John Lennon", "https://cdn-preview.example.com/4.mp3"),
        Track::new("5", "Hotel California", "Eagles", "https://cdn-preview.example.com/5.mp3"),
        Track::new("6", "Stairway to Heaven", "Led Zeppelin", "https://cdn-preview.example.com/6.mp3"),
        Track::new("7", "Billie Jean", "Michael Jackson", "https://cdn-preview.example.com/7.mp3"),
        Track::new("8", "Yesterday", "The Beatles", "https://cdn-preview.example.com/8.mp3"),
        Track::new("9", "Smells Like Teen Spirit", "Nirvana", "https://cdn-preview.example.com/9.mp3"),
        Track::new("10", "Like a Rolling Stone", "Bob Dylan", "https://cdn-preview.example.com/10.mp3"),
        Track::new("11", "What's Going On", "Marvin Gaye", "https://cdn-preview.example.com/11.mp3"),
        Track::new("12", "Respect", "Aretha Franklin", "https://cdn-preview.example.com/12.mp3"),
        Track::new("13", "Good Vibrations", "The Beach Boys", "https://cdn-preview.example.com/13.mp3"),
        Track::new("14", "Johnny B. Goode", "Chuck Berry", "https://cdn-preview.example.com/14.mp3"),
        Track::new("15", "Hey Jude", "The Beatles", "https://cdn-preview.example.com/15.mp3"),
    ]
}

/// Select fallback results for a query.
pub fn select(query: &str) -> Vec<Track> {
    let tracks = seeded_tracks();

    if query.trim().is_empty() {
        return tracks.into_iter().take(BLANK_QUERY_TAKE).collect();
    }

    let needle = query.to_lowercase();
    let matches: Vec<Track> = tracks
        .iter()
        .filter(|track| {
            track.title.to_lowercase().contains(&needle)
                || track.artist.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        tracks.into_iter().take(NO_MATCH_TAKE).collect()
    } else {
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_returns_ten() {
        let tracks = select("");
        assert_eq!(tracks.len(), 10);
        assert_eq!(tracks[0].title, "Blinding Lights");

        let tracks = select("   ");
        assert_eq!(tracks.len(), 10);
    }

    #[test]
    fn filter_is_case_insensitive_over_title_and_artist() {
        let by_title = select("bohemian");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].artist, "Queen");

        let by_artist = select("BEATLES");
        assert_eq!(by_artist.len(), 2);
        assert!(by_artist.iter().all(|t| t.artist == "The Beatles"));
    }

    #[test]
    fn no_match_returns_five_popular_tracks() {
        let tracks = select("zzzzz no such song");
        assert_eq!(tracks.len(), 5);
        assert_eq!(tracks[0].id, "1");
    }

    #[test]
    fn every_seeded_track_has_a_playable_preview() {
        for track in select("") {
            assert!(track.preview_url.starts_with("https://"));
        }
    }
}
