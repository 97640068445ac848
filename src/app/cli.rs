use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lyricsync - karaoke lyrics that follow the music, in your terminal 🎤
#[derive(Parser, Debug)]
#[command(name = "lyricsync", version, about)]
pub struct Args {
    /// Album manifest (JSON) to open. Defaults to the last one played
    #[arg(long, short = 'a')]
    pub album: Option<PathBuf>,

    /// Lyrics language (overrides config.toml)
    #[arg(long, short = 'l')]
    pub lang: Option<String>,

    /// Lyrics API base URL (overrides config.toml)
    #[arg(long)]
    pub api: Option<String>,

    /// Track id to start with
    #[arg(long, short = 't')]
    pub track: Option<String>,

    /// Debug-level logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload an .lrc file as the synced lyrics of a track
    PushSync {
        #[arg(long)]
        album_id: String,
        #[arg(long)]
        track_id: String,
        /// Path to the .lrc file
        file: PathBuf,
        #[arg(long)]
        authorship: Option<String>,
    },
    /// Upload plain lyric text for a track and keep a local copy
    PushText {
        #[arg(long)]
        album_id: String,
        #[arg(long)]
        track_id: String,
        /// Path to the text file
        file: PathBuf,
        #[arg(long)]
        authorship: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_subcommand() {
        let args = Args::parse_from([
            "lyricsync",
            "--lang",
            "ru",
            "push-sync",
            "--album-id",
            "a1",
            "--track-id",
            "t1",
            "song.lrc",
        ]);
        assert_eq!(args.lang.as_deref(), Some("ru"));
        match args.command {
            Some(Command::PushSync { album_id, file, .. }) => {
                assert_eq!(album_id, "a1");
                assert_eq!(file, PathBuf::from("song.lrc"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
