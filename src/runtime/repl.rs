//! Line-oriented console front end.
//!
//! One command per line; track numbers are 1-based positions in the
//! loaded tracklist. All playback state lives in the player thread, so
//! this loop only sends commands and prints snapshots.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::error::Result;
use crate::player::{Player, PlayerPhase, SessionState};
use crate::track::TrackDescriptor;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum ReplCmd {
    Play(usize),
    Pause,
    Resume,
    Toggle,
    Seek(f64),
    Volume(f32),
    Loop,
    Next,
    Prev,
    Queue(Vec<usize>),
    ClearQueue,
    List,
    Status,
    Help,
    Quit,
}

/// Parse one input line. `Ok(None)` for blank lines, `Err` with a usage
/// message for anything malformed.
pub(super) fn parse(line: &str) -> std::result::Result<Option<ReplCmd>, String> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let want_none = |cmd: ReplCmd| {
        if rest.is_empty() {
            Ok(Some(cmd))
        } else {
            Err(format!("'{keyword}' takes no arguments"))
        }
    };

    match keyword {
        "play" | "p" => {
            let [arg] = rest.as_slice() else {
                return Err("usage: play <track number>".to_string());
            };
            let n: usize = arg
                .parse()
                .map_err(|_| format!("not a track number: {arg}"))?;
            if n == 0 {
                return Err("track numbers start at 1".to_string());
            }
            Ok(Some(ReplCmd::Play(n)))
        }
        "seek" => {
            let [arg] = rest.as_slice() else {
                return Err("usage: seek <seconds>".to_string());
            };
            let secs: f64 = arg.parse().map_err(|_| format!("not a number: {arg}"))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err("seek position must be non-negative".to_string());
            }
            Ok(Some(ReplCmd::Seek(secs)))
        }
        "vol" | "volume" => {
            let [arg] = rest.as_slice() else {
                return Err("usage: vol <0.0..1.0>".to_string());
            };
            let v: f32 = arg.parse().map_err(|_| format!("not a number: {arg}"))?;
            Ok(Some(ReplCmd::Volume(v)))
        }
        "add" | "queue" => {
            if rest.is_empty() {
                return Err("usage: add <track number>...".to_string());
            }
            let mut numbers = Vec::with_capacity(rest.len());
            for arg in &rest {
                let n: usize = arg
                    .parse()
                    .map_err(|_| format!("not a track number: {arg}"))?;
                if n == 0 {
                    return Err("track numbers start at 1".to_string());
                }
                numbers.push(n);
            }
            Ok(Some(ReplCmd::Queue(numbers)))
        }
        "pause" => want_none(ReplCmd::Pause),
        "resume" => want_none(ReplCmd::Resume),
        "toggle" | "t" => want_none(ReplCmd::Toggle),
        "loop" => want_none(ReplCmd::Loop),
        "next" | "n" => want_none(ReplCmd::Next),
        "prev" => want_none(ReplCmd::Prev),
        "clear" => want_none(ReplCmd::ClearQueue),
        "list" | "ls" => want_none(ReplCmd::List),
        "status" | "s" => want_none(ReplCmd::Status),
        "help" | "?" => want_none(ReplCmd::Help),
        "quit" | "q" => want_none(ReplCmd::Quit),
        other => Err(format!("unknown command: {other} (try 'help')")),
    }
}

fn format_time(d: Duration) -> String {
    let total = d.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

fn phase_label(phase: PlayerPhase) -> &'static str {
    match phase {
        PlayerPhase::Idle => "idle",
        PlayerPhase::Loading => "loading",
        PlayerPhase::Playing => "playing",
        PlayerPhase::Paused => "paused",
    }
}

fn print_status(snap: &SessionState) {
    match snap.current_track.as_ref() {
        Some(track) => {
            let position = format_time(snap.position);
            let duration = snap
                .duration
                .map(format_time)
                .unwrap_or_else(|| "-:--".to_string());
            println!(
                "[{}] {} ({position}/{duration}) vol {:.2} loop {}",
                phase_label(snap.phase),
                track.display(),
                snap.volume,
                if snap.loop_enabled { "on" } else { "off" },
            );
        }
        None => println!("[{}] no track", phase_label(snap.phase)),
    }
}

fn print_tracklist(tracks: &[TrackDescriptor]) {
    for (i, track) in tracks.iter().enumerate() {
        let hint = track
            .duration_hint()
            .map(|d| format!(" [{}]", format_time(d)))
            .unwrap_or_default();
        println!("{:3}. {}{hint}", i + 1, track.display());
    }
}

fn print_help() {
    println!("commands:");
    println!("  play <n>       play track n from the list");
    println!("  pause / resume / toggle");
    println!("  seek <secs>    jump within the current track");
    println!("  vol <0..1>     set output volume");
    println!("  loop           toggle looping of short tracks");
    println!("  next / prev    move through the queue");
    println!("  add <n>...     append tracks to the queue");
    println!("  clear          empty the queue");
    println!("  list / status / help / quit");
}

fn track_at<'a>(tracks: &'a [TrackDescriptor], n: usize) -> Option<&'a TrackDescriptor> {
    tracks.get(n - 1)
}

pub(super) fn run(player: &Player, tracks: &[TrackDescriptor]) -> Result<()> {
    println!("{} tracks loaded; 'help' lists commands", tracks.len());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF behaves like quit.
            break;
        }

        let cmd = match parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match cmd {
            ReplCmd::Play(n) => match track_at(tracks, n) {
                Some(track) => player.play(track.clone())?,
                None => println!("no track {n}"),
            },
            ReplCmd::Pause => player.pause()?,
            ReplCmd::Resume => player.resume()?,
            ReplCmd::Toggle => player.toggle_play_pause()?,
            ReplCmd::Seek(secs) => player.seek(Duration::from_secs_f64(secs))?,
            ReplCmd::Volume(v) => player.set_volume(v)?,
            ReplCmd::Loop => player.toggle_loop()?,
            ReplCmd::Next => player.next()?,
            ReplCmd::Prev => player.previous()?,
            ReplCmd::Queue(numbers) => {
                let mut picked = Vec::with_capacity(numbers.len());
                for n in numbers {
                    match track_at(tracks, n) {
                        Some(track) => picked.push(track.clone()),
                        None => println!("no track {n}"),
                    }
                }
                if !picked.is_empty() {
                    player.add_to_queue(picked)?;
                }
            }
            ReplCmd::ClearQueue => player.clear_queue()?,
            ReplCmd::List => print_tracklist(tracks),
            ReplCmd::Status => print_status(&player.snapshot()),
            ReplCmd::Help => print_help(),
            ReplCmd::Quit => break,
        }

        // Surface anything the engine reported since the last command.
        for notice in player.take_notices() {
            println!("! {notice}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_parse_to_nothing() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   \t ").unwrap(), None);
    }

    #[test]
    fn play_takes_a_one_based_track_number() {
        assert_eq!(parse("play 3").unwrap(), Some(ReplCmd::Play(3)));
        assert_eq!(parse("p 1").unwrap(), Some(ReplCmd::Play(1)));
        assert!(parse("play").is_err());
        assert!(parse("play zero").is_err());
        assert!(parse("play 0").is_err());
    }

    #[test]
    fn seek_accepts_fractional_seconds() {
        assert_eq!(parse("seek 12.5").unwrap(), Some(ReplCmd::Seek(12.5)));
        assert!(parse("seek -1").is_err());
        assert!(parse("seek nan").is_err());
    }

    #[test]
    fn volume_parses_a_float() {
        assert_eq!(parse("vol 0.4").unwrap(), Some(ReplCmd::Volume(0.4)));
        assert_eq!(parse("volume 1").unwrap(), Some(ReplCmd::Volume(1.0)));
        assert!(parse("vol loud").is_err());
    }

    #[test]
    fn add_collects_every_number() {
        assert_eq!(
            parse("add 1 2 5").unwrap(),
            Some(ReplCmd::Queue(vec![1, 2, 5]))
        );
        assert!(parse("add").is_err());
        assert!(parse("add 1 x").is_err());
    }

    #[test]
    fn bare_keywords_reject_stray_arguments() {
        assert_eq!(parse("pause").unwrap(), Some(ReplCmd::Pause));
        assert_eq!(parse("q").unwrap(), Some(ReplCmd::Quit));
        assert!(parse("pause now").is_err());
    }

    #[test]
    fn unknown_commands_point_at_help() {
        let err = parse("shuffle").unwrap_err();
        assert!(err.contains("help"));
    }

    #[test]
    fn times_format_as_minutes_and_seconds() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_secs(65)), "1:05");
        assert_eq!(format_time(Duration::from_secs(600)), "10:00");
    }
}
