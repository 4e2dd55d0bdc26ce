//! # Play Command
//!
//! A full game at the terminal. With `--vs human` seat 0 is yours and the
//! other seats are AI; with `--vs ai` every seat is AI and the game is
//! printed as it is played.
//!
//! ## Input
//!
//! - `<n>`: play card `[n]` of your hand
//! - `d`: draw (when it is your turn to draw)
//! - `m <k>`: declare meld option `<k>` while your meld window is open
//! - `f`: close your meld window without declaring more
//! - `q`: quit the game

use super::resolve_config;
use crate::cli::Vs;
use crate::error::CliError;
use crate::io_utils::read_stdin_line;
use crate::ui;
use besigue_ai::autoplay::{StepResult, step};
use besigue_ai::pacing::Pacer;
use besigue_ai::{DecisionProvider, create_provider};
use besigue_engine::arena::CardId;
use besigue_engine::engine::{DrawOutcome, Engine, Seat};
use besigue_engine::events::TracingSink;
use besigue_engine::game::Turn;
use besigue_engine::melds::Meld;
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub vs: Vs,
    pub players: Option<usize>,
    pub seed: Option<u64>,
    pub delay_ms: u64,
    pub winning_score: Option<i32>,
}

/// A parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseResult {
    Play(usize),
    Draw,
    Meld(usize),
    Finish,
    Quit,
    Invalid(String),
}

fn parse_input(line: &str) -> ParseResult {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return ParseResult::Invalid("Empty input".into());
    };
    let rest = parts.next();
    if parts.next().is_some() {
        return ParseResult::Invalid(format!("Unexpected input: {}", line));
    }
    match (head.to_ascii_lowercase().as_str(), rest) {
        ("q" | "quit", None) => ParseResult::Quit,
        ("d" | "draw", None) => ParseResult::Draw,
        ("f" | "done", None) => ParseResult::Finish,
        ("m" | "meld", Some(k)) => match k.parse() {
            Ok(k) => ParseResult::Meld(k),
            Err(_) => ParseResult::Invalid(format!("Invalid meld number: {}", k)),
        },
        ("m" | "meld", None) => ParseResult::Invalid("Usage: m <k>".into()),
        (n, None) => match n.parse() {
            Ok(i) => ParseResult::Play(i),
            Err(_) => ParseResult::Invalid(format!("Unrecognized input: {}", line)),
        },
        _ => ParseResult::Invalid(format!("Unrecognized input: {}", line)),
    }
}

pub fn handle_play_command(
    opts: PlayOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = resolve_config(opts.players, opts.seed, opts.winning_score)?;
    let seed = cfg.seed.unwrap_or_else(rand::random);

    let seats: Vec<Seat> = (0..cfg.players)
        .map(|i| match (opts.vs, i) {
            (Vs::Human, 0) => Seat::human("You"),
            _ => Seat::ai(format!("P{}", i + 1)),
        })
        .collect();
    let providers = (0..cfg.players)
        .map(|seat| create_provider(&cfg.ai, Some(seed.wrapping_add(seat as u64))))
        .collect::<Result<Vec<Box<dyn DecisionProvider>>, _>>()?;
    let providers: Vec<&dyn DecisionProvider> = providers.iter().map(|p| p.as_ref()).collect();
    let pacer = Pacer::from_millis(opts.delay_ms);

    let mut eng = Engine::new(cfg.rules, seats, Some(seed))?;
    eng.subscribe(Box::new(TracingSink));
    writeln!(
        out,
        "play: vs={} players={} seed={}",
        opts.vs.as_str(),
        cfg.players,
        seed
    )?;
    eng.start_new_game()?;
    announce_round(&eng, out)?;

    loop {
        match step(&mut eng, &providers, &pacer)? {
            StepResult::Drew {
                player,
                melds,
                outcome,
            } => {
                announce_melds(&eng, player, &melds, out)?;
                let name = eng.players()[player].name().to_string();
                match outcome {
                    DrawOutcome::Drew(_) => writeln!(out, "{} draws", name)?,
                    DrawOutcome::CapReached => writeln!(out, "{} holds a full hand", name)?,
                    DrawOutcome::Exhausted => {}
                }
                if eng.is_endgame() && matches!(outcome, DrawOutcome::Drew(_)) {
                    writeln!(out, "Draw pile exhausted: endgame begins")?;
                }
            }
            StepResult::Played {
                player,
                melds,
                card,
                outcome,
            } => {
                announce_melds(&eng, player, &melds, out)?;
                writeln!(out, "{} plays {}", eng.players()[player].name(), card.card())?;
                if let Some(w) = outcome.trick_winner {
                    writeln!(out, "Trick won by {}", eng.players()[w].name())?;
                }
            }
            StepResult::AwaitingHuman(turn) => {
                if !human_turn(&mut eng, turn, out, err, stdin)? {
                    writeln!(out, "Game abandoned in round {}", eng.round())?;
                    return Err(CliError::Interrupted("game quit by player".into()));
                }
            }
            StepResult::RoundOver => {
                announce_round_end(&eng, out)?;
                eng.start_next_round()?;
                announce_round(&eng, out)?;
            }
            StepResult::GameOver => {
                announce_round_end(&eng, out)?;
                writeln!(out, "Game over")?;
                for s in eng.standings() {
                    writeln!(
                        out,
                        "  {}. {} {}",
                        s.place,
                        eng.players()[s.player].name(),
                        s.total
                    )?;
                }
                break;
            }
        }
    }
    Ok(())
}

fn announce_round(eng: &Engine, out: &mut dyn Write) -> Result<(), CliError> {
    let dealer = eng.dealer().map(|d| eng.players()[d].name()).unwrap_or("-");
    writeln!(out, "Round {}: dealer {}", eng.round(), dealer)?;
    Ok(())
}

fn announce_round_end(eng: &Engine, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "Round {} complete. Scores:", eng.round())?;
    ui::write_scores(out, eng.players())?;
    Ok(())
}

fn announce_melds(
    eng: &Engine,
    player: usize,
    melds: &[Meld],
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let name = eng.players()[player].name();
    for m in melds {
        writeln!(
            out,
            "{} declares {} ({}) for {}",
            name,
            ui::meld_name(m.meld_type),
            ui::format_cards(&m.cards),
            m.points
        )?;
    }
    if !melds.is_empty() {
        writeln!(out, "Trump: {}", ui::format_trump(eng.trump()))?;
    }
    Ok(())
}

fn show_table(eng: &Engine, player: usize, out: &mut dyn Write) -> Result<(), CliError> {
    let me = eng.player(player)?;
    writeln!(
        out,
        "Trump: {} | Draw pile: {} | Score: {}",
        ui::format_trump(eng.trump()),
        eng.draw_pile_len(),
        me.total()
    )?;
    let trick: Vec<CardId> = eng.current_trick().iter().map(|t| t.card).collect();
    if !trick.is_empty() {
        writeln!(out, "Trick: {}", ui::format_cards(&trick))?;
    }
    if !me.melded().is_empty() {
        writeln!(out, "Melded: {}", ui::format_cards(me.melded()))?;
    }
    writeln!(out, "Hand: {}", ui::format_numbered(me.held()))?;
    if eng.meld_window() == Some(player) {
        let options = eng.meld_options(player);
        for (k, c) in options.iter().enumerate() {
            writeln!(out, "  m {}: {}", k, ui::format_candidate(c))?;
        }
    }
    Ok(())
}

/// Reads input until the human's turn action succeeds. Returns `false` when
/// the player quits or input ends.
fn human_turn(
    eng: &mut Engine,
    turn: Turn,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<bool, CliError> {
    let player = turn.player();
    show_table(eng, player, out)?;
    loop {
        match turn {
            Turn::Draw(_) => write!(out, "Your draw (d, m <k>, f, q): ")?,
            Turn::Play(_) => write!(out, "Your play (<n>, m <k>, f, q): ")?,
        }
        out.flush()?;

        let Some(line) = read_stdin_line(stdin) else {
            return Ok(false);
        };
        match parse_input(&line) {
            ParseResult::Quit => return Ok(false),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
            ParseResult::Meld(k) => {
                let options = eng.meld_options(player);
                let Some(c) = options.get(k) else {
                    ui::write_error(err, &format!("No meld option {}", k))?;
                    continue;
                };
                match eng.declare_meld(player, c.meld_type, &c.cards) {
                    Ok(m) => {
                        announce_melds(eng, player, &[m], out)?;
                        show_table(eng, player, out)?;
                    }
                    Err(e) => ui::write_error(err, &e.to_string())?,
                }
            }
            ParseResult::Finish => match eng.finish_melding(player) {
                Ok(()) => writeln!(out, "Meld window closed")?,
                Err(e) => ui::write_error(err, &e.to_string())?,
            },
            ParseResult::Draw => match eng.draw(player) {
                Ok(DrawOutcome::Drew(card)) => {
                    writeln!(out, "You draw {}", card.card())?;
                    return Ok(true);
                }
                Ok(DrawOutcome::CapReached) => {
                    writeln!(out, "Your hand is full; no card drawn")?;
                    return Ok(true);
                }
                Ok(DrawOutcome::Exhausted) => return Ok(true),
                Err(e) => ui::write_error(err, &e.to_string())?,
            },
            ParseResult::Play(i) => {
                let Some(&card) = eng.player(player)?.held().get(i) else {
                    ui::write_error(err, &format!("No card [{}] in your hand", i))?;
                    continue;
                };
                match eng.play_card(player, card) {
                    Ok(outcome) => {
                        writeln!(out, "You play {}", card.card())?;
                        if let Some(w) = outcome.trick_winner {
                            writeln!(out, "Trick won by {}", eng.players()[w].name())?;
                        }
                        return Ok(true);
                    }
                    Err(e) => ui::write_error(err, &e.to_string())?,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_input_commands() {
        assert_eq!(parse_input("3"), ParseResult::Play(3));
        assert_eq!(parse_input("d"), ParseResult::Draw);
        assert_eq!(parse_input("m 1"), ParseResult::Meld(1));
        assert_eq!(parse_input("F"), ParseResult::Finish);
        assert_eq!(parse_input("quit"), ParseResult::Quit);
        assert!(matches!(parse_input("m"), ParseResult::Invalid(_)));
        assert!(matches!(parse_input("m x"), ParseResult::Invalid(_)));
        assert!(matches!(parse_input("play 1 2"), ParseResult::Invalid(_)));
        assert!(matches!(parse_input(""), ParseResult::Invalid(_)));
    }

    #[test]
    fn test_quit_immediately_is_interrupted() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"q\n");
        let opts = PlayOptions {
            vs: Vs::Human,
            players: Some(2),
            seed: Some(4),
            delay_ms: 0,
            winning_score: None,
        };
        let result = handle_play_command(opts, &mut out, &mut err, &mut input);
        assert!(matches!(result, Err(CliError::Interrupted(_))));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("play: vs=human players=2 seed=4"));
        assert!(text.contains("Game abandoned"));
    }

    #[test]
    fn test_invalid_input_is_reported_and_retried() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"banana\n99\nq\n");
        let opts = PlayOptions {
            vs: Vs::Human,
            players: Some(3),
            seed: Some(8),
            delay_ms: 0,
            winning_score: None,
        };
        let _ = handle_play_command(opts, &mut out, &mut err, &mut input);
        let errors = String::from_utf8(err).unwrap();
        assert!(errors.contains("Unrecognized input: banana"));
    }

    #[test]
    fn test_scripted_human_finishes_a_game() {
        // every turn cycles draw then card indices until one is accepted
        let cycle: String = std::iter::once("d".to_string())
            .chain((0..20).map(|i| i.to_string()))
            .map(|l| l + "\n")
            .collect();
        let script = cycle.repeat(20_000);
        let mut input = Cursor::new(script.into_bytes());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let opts = PlayOptions {
            vs: Vs::Human,
            players: Some(2),
            seed: Some(17),
            delay_ms: 0,
            winning_score: Some(200),
        };
        handle_play_command(opts, &mut out, &mut err, &mut input).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Round 1 complete"));
        assert!(text.contains("Game over"));
        assert!(text.contains("You play"));
    }

    #[test]
    fn test_watched_ai_game_prints_standings() {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let opts = PlayOptions {
            vs: Vs::Ai,
            players: Some(3),
            seed: Some(5),
            delay_ms: 0,
            winning_score: Some(200),
        };
        handle_play_command(opts, &mut out, &mut err, &mut input).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Game over"));
        assert!(text.contains("  1. P"));
        assert!(text.contains("  3. P"));
    }
}
