use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt;

use crate::arena::{CardArena, CardId, Location};
use crate::cards::{Card, Rank, Suit, POOL_SIZE};
use crate::deck::{is_complete_pool, Deck, DeckProvider};
use crate::errors::{CardRejection, GameError, MeldRejection};
use crate::events::{EventSink, GameEvent, RoundScore, Standing};
use crate::game::{CompletedTrick, Phase, PlayerView, RoundSnapshot, TrickPlay, Turn};
use crate::logger::{MeldEntry, RoundRecord};
use crate::melds::{self, Meld, MeldCandidate, MeldContext, MeldType, PlayerCards};
use crate::player::{Player, PlayerKind, ScoreSheet};
use crate::rules::{check_play, trick_winner, DealerMethod, RulesConfig};
use crate::tiebreak;

const DEFAULT_SEED: u64 = 0xB351_9E00;

/// Name and controller of a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub name: String,
    pub kind: PlayerKind,
}

impl Seat {
    pub fn ai(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Ai,
        }
    }

    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Human,
        }
    }
}

/// Result of a draw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drew(CardId),
    /// Draw pile empty; the requirement counts as met.
    Exhausted,
    /// Held pile already at the cap; no card taken, the requirement counts as met.
    CapReached,
}

/// What a successful play changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Winner, when this play completed the trick.
    pub trick_winner: Option<usize>,
    pub round_over: bool,
    pub game_over: bool,
}

/// Explicit mid-round arrangement used to resume or stage a round.
///
/// Cards are given by face; the engine assigns physical copies. Cards not
/// placed anywhere are treated as already played.
#[derive(Debug, Clone, Default)]
pub struct RoundLayout {
    pub hands: Vec<Vec<Card>>,
    /// Per-player melded piles; empty means none.
    pub melded: Vec<Vec<Card>>,
    /// Per-player scores carried from earlier rounds; empty means zero.
    pub scores: Vec<ScoreSheet>,
    /// Draw pile, next card first.
    pub draw_pile: Vec<Card>,
    pub trump: Option<Suit>,
    pub leader: usize,
    /// The first trick of a round waives the draw.
    pub opening_trick: bool,
    /// The leader has just won a trick and may declare melds.
    pub meld_window: bool,
}

#[derive(Debug, Clone)]
struct MeldWindow {
    player: usize,
    declared: Vec<MeldType>,
}

/// Bésigue round engine.
///
/// Drives the draw/play cycle, melding, trick resolution, end-of-round
/// scoring and game-over detection for 2-4 seats. Every mutating call checks
/// the acting seat against the expected [`Turn`] and validates fully before
/// changing anything, so a rejected call leaves the engine untouched.
///
/// # Examples
///
/// ```
/// use besigue_engine::engine::{DrawOutcome, Engine};
/// use besigue_engine::game::{Phase, Turn};
/// use besigue_engine::rules::RulesConfig;
///
/// let mut engine = Engine::with_ai_players(RulesConfig::default(), 2, Some(7)).unwrap();
/// engine.start_new_game().unwrap();
/// assert_eq!(engine.phase(), Phase::Playing);
///
/// // the opening trick waives the draw
/// let Some(Turn::Play(leader)) = engine.turn() else { panic!("leader plays first") };
/// let card = engine.playable_cards(leader)[0];
/// engine.play_card(leader, card).unwrap();
/// assert!(engine.check_conservation().is_ok());
/// ```
pub struct Engine {
    config: RulesConfig,
    seed: u64,
    rng: ChaCha20Rng,
    deck: Deck,
    arena: CardArena,
    players: Vec<Player>,
    phase: Phase,
    round: u32,
    trump: Option<Suit>,
    dealer: Option<usize>,
    leader: usize,
    turn: Option<Turn>,
    has_drawn: Vec<bool>,
    opening_trick: bool,
    meld_window: Option<MeldWindow>,
    endgame: bool,
    current_trick: Vec<TrickPlay>,
    history: Vec<CompletedTrick>,
    /// Cards outside any recorded trick but no longer in play (layouts).
    out_of_play: Vec<CardId>,
    events: Vec<GameEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    standings: Vec<Standing>,
    last_record: Option<RoundRecord>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("trump", &self.trump)
            .field("turn", &self.turn)
            .field("draw_pile", &self.deck.remaining())
            .field("players", &self.players)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(config: RulesConfig, seats: Vec<Seat>, seed: Option<u64>) -> Result<Self, GameError> {
        config.validate()?;
        RulesConfig::check_player_count(seats.len())?;
        let seed = seed.unwrap_or(DEFAULT_SEED);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let deck = Deck::new_with_seed(rng.next_u64());
        let n = seats.len();
        let players = seats
            .into_iter()
            .enumerate()
            .map(|(i, s)| Player::new(i, s.name, s.kind))
            .collect();
        Ok(Self {
            config,
            seed,
            rng,
            deck,
            arena: CardArena::new(),
            players,
            phase: Phase::Setup,
            round: 0,
            trump: None,
            dealer: None,
            leader: 0,
            turn: None,
            has_drawn: vec![false; n],
            opening_trick: true,
            meld_window: None,
            endgame: false,
            current_trick: Vec::new(),
            history: Vec::new(),
            out_of_play: Vec::new(),
            events: Vec::new(),
            sinks: Vec::new(),
            standings: Vec::new(),
            last_record: None,
        })
    }

    /// `count` AI seats named P1..Pn.
    pub fn with_ai_players(config: RulesConfig, count: usize, seed: Option<u64>) -> Result<Self, GameError> {
        let seats = (1..=count).map(|i| Seat::ai(format!("P{}", i))).collect();
        Self::new(config, seats, seed)
    }

    /// Builds a round already in progress from `layout`.
    pub fn from_layout(
        config: RulesConfig,
        seats: Vec<Seat>,
        layout: RoundLayout,
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        let mut eng = Self::new(config, seats, seed)?;
        let n = eng.players.len();
        let bad = |msg: &str| GameError::InvalidLayout(msg.to_string());

        if layout.hands.len() != n {
            return Err(bad("one hand per player required"));
        }
        if !layout.melded.is_empty() && layout.melded.len() != n {
            return Err(bad("melded piles must be given for every player or none"));
        }
        if !layout.scores.is_empty() && layout.scores.len() != n {
            return Err(bad("scores must be given for every player or none"));
        }
        if layout.leader >= n {
            return Err(bad("leader out of range"));
        }
        let melded_len = |p: usize| layout.melded.get(p).map_or(0, Vec::len);
        let counts: Vec<usize> = (0..n).map(|p| layout.hands[p].len() + melded_len(p)).collect();
        if counts.iter().any(|&c| c != counts[0] || c == 0) {
            return Err(bad("every player needs the same, non-zero number of cards"));
        }
        if layout.draw_pile.len() % n != 0 {
            return Err(bad("draw pile must divide evenly among players"));
        }

        let mut used = [false; POOL_SIZE];
        let mut take = |card: Card| -> Result<CardId, GameError> {
            let id = CardId::all()
                .find(|id| !used[id.index()] && id.card() == card)
                .ok_or_else(|| GameError::InvalidLayout(format!("too many copies of {}", card)))?;
            used[id.index()] = true;
            Ok(id)
        };

        let mut hands = Vec::with_capacity(n);
        let mut melded = Vec::with_capacity(n);
        for p in 0..n {
            let h = layout.hands[p].iter().map(|&c| take(c)).collect::<Result<Vec<_>, _>>()?;
            let m = match layout.melded.get(p) {
                Some(cards) => cards.iter().map(|&c| take(c)).collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            hands.push(h);
            melded.push(m);
        }
        let pile = layout.draw_pile.iter().map(|&c| take(c)).collect::<Result<Vec<_>, _>>()?;
        let rest: Vec<CardId> = CardId::all().filter(|id| !used[id.index()]).collect();

        for (p, (h, m)) in hands.into_iter().zip(melded).enumerate() {
            for &id in &h {
                eng.arena.set_location(id, Location::Held(p));
            }
            for &id in &m {
                eng.arena.set_location(id, Location::Melded(p));
            }
            eng.players[p].add_cards(&h);
            eng.players[p].set_melded(m);
            if let Some(score) = layout.scores.get(p) {
                eng.players[p].set_score(*score);
            }
        }
        for &id in &rest {
            eng.arena.set_location(id, Location::History);
        }
        let deck_seed = eng.rng.next_u64();
        eng.deck = Deck::from_order(pile, deck_seed);
        eng.out_of_play = rest;

        eng.round = 1;
        eng.trump = layout.trump;
        eng.leader = layout.leader;
        let dealer = (layout.leader + n - 1) % n;
        eng.dealer = Some(dealer);
        eng.players[dealer].set_dealer(true);
        eng.opening_trick = layout.opening_trick;
        eng.set_phase(Phase::Playing);

        if eng.deck.is_empty() {
            eng.enter_endgame();
            eng.set_turn(Some(Turn::Play(eng.leader)));
        } else {
            if layout.meld_window {
                eng.meld_window = Some(MeldWindow {
                    player: eng.leader,
                    declared: Vec::new(),
                });
            }
            let first = if eng.opening_trick {
                Turn::Play(eng.leader)
            } else {
                Turn::Draw(eng.leader)
            };
            eng.set_turn(Some(first));
        }
        eng.check_conservation()?;
        Ok(eng)
    }

    // ----- lifecycle -----

    /// Resets every player and starts round 1.
    pub fn start_new_game(&mut self) -> Result<(), GameError> {
        if self.phase.is_trick_phase() || self.phase == Phase::Scoring {
            tracing::info!(round = self.round, "abandoning game in progress");
        }
        for p in &mut self.players {
            p.reset_game();
        }
        self.standings.clear();
        self.last_record = None;
        self.round = 1;
        tracing::info!(seed = self.seed, players = self.players.len(), "new game");
        self.begin_round()
    }

    /// Starts the next round after scoring.
    pub fn start_next_round(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Scoring {
            return Err(GameError::PhaseMismatch { actual: self.phase });
        }
        self.round += 1;
        self.begin_round()
    }

    fn begin_round(&mut self) -> Result<(), GameError> {
        self.set_phase(Phase::DealerDetermination);
        self.set_turn(None);
        for p in &mut self.players {
            p.reset_round();
        }
        self.arena.collect_all();
        self.deck.reset();
        self.deck.shuffle();
        self.current_trick.clear();
        self.history.clear();
        self.out_of_play.clear();
        self.trump = None;
        self.endgame = false;
        self.meld_window = None;

        let n = self.players.len();
        let dealer = self.determine_dealer()?;
        self.dealer = Some(dealer);
        self.players[dealer].set_dealer(true);

        let needed = n * self.config.hand_size;
        let remaining = self.deck.remaining();
        let hands = self
            .deck
            .deal_initial(n, self.config.hand_size)
            .ok_or(GameError::DeckExhausted { needed, remaining })?;
        // dealing starts with the seat after the dealer
        for (i, hand) in hands.into_iter().enumerate() {
            let seat = (dealer + 1 + i) % n;
            for &id in &hand {
                self.arena.set_location(id, Location::Held(seat));
            }
            self.players[seat].add_cards(&hand);
        }

        self.leader = (dealer + 1) % n;
        self.opening_trick = true;
        self.has_drawn = vec![false; n];
        self.emit(GameEvent::DealerChosen {
            round: self.round,
            dealer,
            leader: self.leader,
        });
        tracing::info!(round = self.round, dealer, leader = self.leader, "round started");
        self.set_phase(Phase::Playing);
        self.set_turn(Some(Turn::Play(self.leader)));
        self.debug_check();
        Ok(())
    }

    fn determine_dealer(&mut self) -> Result<usize, GameError> {
        let n = self.players.len();
        match self.config.dealer_method {
            DealerMethod::Random => Ok(self.rng.random_range(0..n)),
            DealerMethod::DrawJacks => {
                let mut drawn = Vec::new();
                let mut seat = 0;
                let dealer = loop {
                    let Some(id) = self.deck.draw() else {
                        self.deck.return_cards(&drawn);
                        return Err(GameError::DeckExhausted {
                            needed: 1,
                            remaining: 0,
                        });
                    };
                    drawn.push(id);
                    tracing::debug!(seat, card = %id.card(), "dealer draw");
                    if id.card().rank() == Some(Rank::Jack) {
                        break seat;
                    }
                    seat = (seat + 1) % n;
                };
                self.deck.return_cards(&drawn);
                self.deck.shuffle();
                Ok(dealer)
            }
        }
    }

    // ----- actions -----

    /// Draws one card for `player` during the draw cycle.
    pub fn draw(&mut self, player: usize) -> Result<DrawOutcome, GameError> {
        self.require_player(player)?;
        self.require_trick_phase()?;
        match self.turn {
            Some(Turn::Draw(p)) if p == player => {}
            other => return self.reject(GameError::InvalidActor {
                expected: other.map(Turn::player),
                actual: player,
            }),
        }

        self.close_window(player);
        self.has_drawn[player] = true;
        let outcome = if self.players[player].held().len() >= self.config.max_held {
            tracing::debug!(player, "held pile at cap, draw refused");
            DrawOutcome::CapReached
        } else {
            match self.deck.draw() {
                None => DrawOutcome::Exhausted,
                Some(id) => {
                    self.arena.set_location(id, Location::Held(player));
                    self.players[player].add_cards(&[id]);
                    self.emit(GameEvent::CardDrawn {
                        player,
                        card: id,
                        remaining: self.deck.remaining(),
                    });
                    DrawOutcome::Drew(id)
                }
            }
        };

        if self.deck.is_empty() && !self.endgame {
            self.enter_endgame();
        }
        self.advance_draw();
        self.debug_check();
        Ok(outcome)
    }

    /// Plays `card` from `player`'s held pile into the current trick.
    pub fn play_card(&mut self, player: usize, card: CardId) -> Result<PlayOutcome, GameError> {
        self.require_player(player)?;
        self.require_trick_phase()?;
        match self.turn {
            Some(Turn::Play(p)) if p == player => {}
            other => return self.reject(GameError::InvalidActor {
                expected: other.map(Turn::player),
                actual: player,
            }),
        }
        if !self.players[player].held().contains(&card) {
            return self.reject(GameError::illegal_card(
                card.card(),
                CardRejection::NotHeld,
            ));
        }
        let held = self.players[player].held_cards();
        let trick = self.current_trick_cards();
        if let Err(reason) = check_play(&held, card.card(), &trick, self.trump, self.endgame) {
            return self.reject(GameError::illegal_card(card.card(), reason));
        }

        self.close_window(player);
        self.players[player].remove_card(card)?;
        self.arena.set_location(card, Location::Trick);
        self.current_trick.push(TrickPlay { player, card });
        self.emit(GameEvent::CardPlayed { player, card });

        let n = self.players.len();
        let mut outcome = PlayOutcome {
            trick_winner: None,
            round_over: false,
            game_over: false,
        };
        if self.current_trick.len() < n {
            self.set_turn(Some(Turn::Play((player + 1) % n)));
        } else {
            let winner = self.resolve_trick();
            outcome.trick_winner = Some(winner);
            outcome.round_over = matches!(self.phase, Phase::Scoring | Phase::GameOver);
            outcome.game_over = self.phase == Phase::GameOver;
        }
        self.debug_check();
        Ok(outcome)
    }

    /// Declares a meld from `cards` during `player`'s meld-offer window.
    pub fn declare_meld(
        &mut self,
        player: usize,
        meld_type: MeldType,
        cards: &[CardId],
    ) -> Result<Meld, GameError> {
        self.require_player(player)?;
        let reject = |reason| GameError::illegal_meld(meld_type, reason);
        if self.phase != Phase::Playing || self.endgame {
            return self.reject(reject(MeldRejection::MeldingDisabled));
        }
        let window = match &self.meld_window {
            None => return self.reject(reject(MeldRejection::WindowClosed)),
            Some(w) if w.player != player => {
                return self.reject(reject(MeldRejection::NotTrickWinner));
            }
            Some(w) => w,
        };
        if window.declared.contains(&meld_type) {
            return self.reject(reject(MeldRejection::AlreadyDeclaredThisWindow));
        }
        if meld_type.rule().once_per_game && self.players[player].declared_this_game(meld_type) {
            return self.reject(reject(MeldRejection::AlreadyDeclaredThisGame));
        }
        let ctx = self.meld_context(player);
        let backing = ctx.intact_royal_marriage;
        let validated = match melds::validate(meld_type, cards, self.player_cards(player), &ctx) {
            Ok(v) => v,
            Err(e) => return self.reject(e),
        };

        for &id in cards {
            self.arena.tag(id, validated.meld_type);
        }
        // the marriage's King and Queen complete the sequence
        if let (MeldType::Sequence, Some(pair)) = (validated.meld_type, backing) {
            for id in pair {
                self.arena.tag(id, MeldType::Sequence);
            }
        }
        for id in self.players[player].meld_from_held(cards) {
            self.arena.set_location(id, Location::Melded(player));
        }
        let meld = Meld {
            meld_type: validated.meld_type,
            cards: cards.to_vec(),
            points: validated.points,
            round: self.round,
        };
        self.players[player].record_meld(meld.clone());
        if let Some(w) = self.meld_window.as_mut() {
            w.declared.push(meld_type);
            if validated.meld_type != meld_type {
                w.declared.push(validated.meld_type);
            }
        }
        if let Some(suit) = validated.establishes_trump {
            self.trump = Some(suit);
            tracing::info!(player, ?suit, "trump established");
            self.emit(GameEvent::TrumpEstablished { suit, by: player });
        }
        tracing::debug!(player, meld = ?meld.meld_type, points = meld.points, "meld declared");
        self.emit(GameEvent::MeldDeclared {
            player,
            meld: meld.clone(),
        });
        self.debug_check();
        Ok(meld)
    }

    /// Closes `player`'s meld-offer window without declaring.
    pub fn finish_melding(&mut self, player: usize) -> Result<(), GameError> {
        self.require_player(player)?;
        match &self.meld_window {
            Some(w) if w.player == player => {
                self.meld_window = None;
                Ok(())
            }
            other => self.reject(GameError::InvalidActor {
                expected: other.as_ref().map(|w| w.player),
                actual: player,
            }),
        }
    }

    // ----- transitions -----

    fn resolve_trick(&mut self) -> usize {
        let n = self.players.len();
        let faces = self.current_trick_cards();
        let winner = trick_winner(&faces, self.leader, self.trump, n);
        let brisques = faces.iter().filter(|c| c.is_brisque()).count() as u32;
        let plays = std::mem::take(&mut self.current_trick);
        for play in &plays {
            self.arena.set_location(play.card, Location::History);
        }
        let number = self.history.len() as u32 + 1;
        let cards: Vec<CardId> = plays.iter().map(|p| p.card).collect();
        self.history.push(CompletedTrick {
            number,
            leader: self.leader,
            plays,
            winner,
        });
        self.players[winner].win_trick(brisques);
        tracing::debug!(trick = number, winner, brisques, "trick completed");
        self.emit(GameEvent::TrickCompleted {
            number,
            winner,
            cards,
        });

        self.leader = winner;
        self.opening_trick = false;
        if self.players.iter().all(Player::has_no_cards) {
            self.finish_round(winner);
            return winner;
        }

        self.has_drawn = vec![false; n];
        if self.endgame {
            self.set_turn(Some(Turn::Play(winner)));
        } else {
            self.meld_window = Some(MeldWindow {
                player: winner,
                declared: Vec::new(),
            });
            self.set_turn(Some(Turn::Draw(winner)));
        }
        winner
    }

    fn advance_draw(&mut self) {
        let n = self.players.len();
        if self.endgame || self.deck.is_empty() {
            self.set_turn(Some(Turn::Play(self.leader)));
            return;
        }
        let next = (0..n)
            .map(|k| (self.leader + k) % n)
            .find(|&seat| !self.has_drawn[seat]);
        match next {
            Some(seat) => self.set_turn(Some(Turn::Draw(seat))),
            None => self.set_turn(Some(Turn::Play(self.leader))),
        }
    }

    fn enter_endgame(&mut self) {
        self.endgame = true;
        self.meld_window = None;
        for p in 0..self.players.len() {
            for id in self.players[p].return_melded() {
                self.arena.set_location(id, Location::Held(p));
            }
        }
        tracing::info!(round = self.round, "draw pile exhausted, endgame");
        self.emit(GameEvent::EndgameStarted { round: self.round });
        self.set_phase(Phase::Endgame);
    }

    fn finish_round(&mut self, last_winner: usize) {
        self.set_turn(None);
        self.meld_window = None;
        self.set_phase(Phase::Scoring);

        let cfg = &self.config;
        self.players[last_winner].add_trick_points(cfg.last_trick_bonus);
        let cutoff_reached = self.players.iter().any(|p| p.total() >= cfg.brisque_cutoff);

        let mut scores = Vec::with_capacity(self.players.len());
        for p in self.players.iter_mut() {
            let converted = !cutoff_reached
                && p.brisques() >= cfg.min_brisques
                && p.total() >= cfg.min_score_for_brisques;
            let brisque_points = if converted {
                p.brisques() as i32 * cfg.brisque_value
            } else {
                -cfg.brisque_penalty
            };
            p.add_brisque_points(brisque_points);
            scores.push(RoundScore {
                player: p.id(),
                brisques: p.brisques(),
                converted,
                brisque_points,
                last_trick_bonus: if p.id() == last_winner {
                    cfg.last_trick_bonus
                } else {
                    0
                },
                total: p.total(),
            });
        }
        tracing::info!(round = self.round, cutoff_reached, "round scored");
        self.emit(GameEvent::RoundScored {
            round: self.round,
            scores: scores.clone(),
        });

        let winning = self.config.winning_score;
        let game_over = self.players.iter().any(|p| p.total() >= winning);
        if game_over {
            let totals: Vec<(usize, i32)> = self.players.iter().map(|p| (p.id(), p.total())).collect();
            let mut pool = Deck::new_with_seed(self.rng.next_u64());
            self.standings = tiebreak::standings(&totals, &mut pool);
        }

        self.last_record = Some(self.build_record(scores, game_over));

        if game_over {
            tracing::info!(winner = ?self.winner(), "game over");
            self.set_phase(Phase::GameOver);
            self.emit(GameEvent::GameOver {
                standings: self.standings.clone(),
            });
        }
    }

    fn build_record(&self, scores: Vec<RoundScore>, game_over: bool) -> RoundRecord {
        let melds = self
            .players
            .iter()
            .flat_map(|p| {
                p.melds().iter().map(move |m| MeldEntry {
                    player: p.id(),
                    meld_type: m.meld_type,
                    points: m.points,
                })
            })
            .collect();
        RoundRecord {
            round_id: String::new(),
            seed: Some(self.seed),
            round: self.round,
            players: self.players.len(),
            dealer: self.dealer,
            trump: self.trump,
            tricks: self.history.len() as u32,
            melds,
            scores,
            result: if game_over {
                self.winner().map(|w| format!("p{}", w))
            } else {
                None
            },
            ts: None,
            meta: None,
        }
    }

    // ----- queries -----

    /// Rule constants this engine was built with.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Seed the game was started from; replaying it reproduces every round.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round number; 0 before the first deal.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Trump suit, unset until the first marriage of the round.
    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub fn dealer(&self) -> Option<usize> {
        self.dealer
    }

    /// Seat that leads the current trick.
    pub fn leader(&self) -> usize {
        self.leader
    }

    /// The expected action, or `None` outside trick play.
    pub fn turn(&self) -> Option<Turn> {
        self.turn
    }

    /// True once the draw pile has run out this round.
    pub fn is_endgame(&self) -> bool {
        self.endgame
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn draw_pile_len(&self) -> usize {
        self.deck.remaining()
    }

    /// Completed tricks of the current round, oldest first.
    pub fn history(&self) -> &[CompletedTrick] {
        &self.history
    }

    /// Location and meld tags of every card.
    pub fn arena(&self) -> &CardArena {
        &self.arena
    }

    /// Final placings; empty until the game is over.
    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn player(&self, id: usize) -> Result<&Player, GameError> {
        self.players.get(id).ok_or(GameError::UnknownPlayer(id))
    }

    /// Seat whose meld-offer window is open.
    pub fn meld_window(&self) -> Option<usize> {
        self.meld_window.as_ref().map(|w| w.player)
    }

    pub fn current_trick(&self) -> &[TrickPlay] {
        &self.current_trick
    }

    pub fn current_trick_cards(&self) -> Vec<Card> {
        self.current_trick.iter().map(|p| p.card.card()).collect()
    }

    /// Winner of a finished game.
    pub fn winner(&self) -> Option<usize> {
        self.standings.first().map(|s| s.player)
    }

    pub fn last_round_record(&self) -> Option<&RoundRecord> {
        self.last_record.as_ref()
    }

    /// Held cards `player` could legally play into the current trick.
    pub fn playable_cards(&self, player: usize) -> Vec<CardId> {
        match self.players.get(player) {
            Some(p) => p.playable_cards(&self.current_trick_cards(), self.trump, self.endgame),
            None => Vec::new(),
        }
    }

    /// Melds `player` could form now, ignoring the meld-offer window.
    pub fn possible_melds(&self, player: usize) -> Vec<MeldCandidate> {
        if self.endgame || player >= self.players.len() {
            return Vec::new();
        }
        melds::detect(self.player_cards(player), &self.meld_context(player))
    }

    /// Melds `player` may declare right now.
    pub fn meld_options(&self, player: usize) -> Vec<MeldCandidate> {
        let Some(w) = self.meld_window.as_ref().filter(|w| w.player == player) else {
            return Vec::new();
        };
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        let p = &self.players[player];
        self.possible_melds(player)
            .into_iter()
            .filter(|c| !w.declared.contains(&c.meld_type))
            .filter(|c| !(c.meld_type.rule().once_per_game && p.declared_this_game(c.meld_type)))
            .collect()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            round: self.round,
            trump: self.trump,
            dealer: self.dealer,
            leader: self.leader,
            turn: self.turn,
            meld_window: self.meld_window(),
            endgame: self.endgame,
            current_trick: self.current_trick_cards(),
            tricks_played: self.history.len() as u32,
            draw_pile: self.deck.remaining(),
            players: self.players.iter().map(PlayerView::from).collect(),
        }
    }

    // ----- events -----

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Takes all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        for sink in self.sinks.iter_mut() {
            sink.on_event(&event);
        }
        self.events.push(event);
    }

    // ----- invariants -----

    /// Verifies that every card is in exactly one place and that the arena
    /// agrees with each container.
    pub fn check_conservation(&self) -> Result<(), GameError> {
        let mut placed: Vec<(CardId, Location)> = Vec::with_capacity(POOL_SIZE);
        placed.extend(self.deck.iter().map(|&id| (id, Location::DrawPile)));
        for p in &self.players {
            placed.extend(p.held().iter().map(|&id| (id, Location::Held(p.id()))));
            placed.extend(p.melded().iter().map(|&id| (id, Location::Melded(p.id()))));
        }
        placed.extend(self.current_trick.iter().map(|t| (t.card, Location::Trick)));
        for trick in &self.history {
            placed.extend(trick.cards().map(|id| (id, Location::History)));
        }
        placed.extend(self.out_of_play.iter().map(|&id| (id, Location::History)));

        let ids: Vec<CardId> = placed.iter().map(|(id, _)| *id).collect();
        if !is_complete_pool(&ids) {
            return Err(GameError::InvariantViolation(format!(
                "{} cards placed, expected {} distinct",
                ids.len(),
                POOL_SIZE
            )));
        }
        if let Some((id, loc)) = placed.iter().find(|(id, loc)| self.arena.location(*id) != *loc) {
            return Err(GameError::InvariantViolation(format!(
                "{} is in {:?} but the arena says {:?}",
                id,
                loc,
                self.arena.location(*id)
            )));
        }
        let seats = (0..self.players.len()).flat_map(|p| [Location::Held(p), Location::Melded(p)]);
        for loc in [Location::DrawPile, Location::Trick, Location::History].into_iter().chain(seats) {
            let expected = placed.iter().filter(|(_, l)| *l == loc).count();
            let counted = self.arena.count_at(loc);
            if counted != expected {
                return Err(GameError::InvariantViolation(format!(
                    "arena counts {} cards in {:?}, containers hold {}",
                    counted, loc, expected
                )));
            }
        }
        if self.deck.remaining() > 0
            && self.players.iter().any(|p| p.held().len() > self.config.max_held)
        {
            return Err(GameError::InvariantViolation(
                "held pile above cap while draw pile is non-empty".into(),
            ));
        }
        Ok(())
    }

    fn debug_check(&self) {
        debug_assert!(
            self.check_conservation().is_ok(),
            "{:?}",
            self.check_conservation()
        );
    }

    // ----- helpers -----

    fn player_cards(&self, player: usize) -> PlayerCards<'_> {
        let p = &self.players[player];
        PlayerCards {
            held: p.held(),
            melded: p.melded(),
        }
    }

    fn meld_context(&self, player: usize) -> MeldContext<'_> {
        MeldContext {
            arena: &self.arena,
            trump: self.trump,
            intact_royal_marriage: self.players[player]
                .intact_royal_marriages()
                .filter(|cards| cards.iter().all(|&id| !self.arena.tags(id).contains(MeldType::Sequence)))
                .find_map(|cards| <[CardId; 2]>::try_from(cards).ok()),
            points: &self.config.meld_points,
            trump_doubling: self.config.trump_doubling,
        }
    }

    fn require_player(&self, player: usize) -> Result<(), GameError> {
        if player < self.players.len() {
            Ok(())
        } else {
            Err(GameError::UnknownPlayer(player))
        }
    }

    fn require_trick_phase(&self) -> Result<(), GameError> {
        if self.phase.is_trick_phase() {
            Ok(())
        } else {
            Err(GameError::PhaseMismatch { actual: self.phase })
        }
    }

    fn reject<T>(&self, err: GameError) -> Result<T, GameError> {
        tracing::debug!(error = %err, "action rejected");
        Err(err)
    }

    fn close_window(&mut self, player: usize) {
        if self.meld_window.as_ref().is_some_and(|w| w.player == player) {
            self.meld_window = None;
        }
    }

    fn set_turn(&mut self, turn: Option<Turn>) {
        self.turn = turn;
        let current = turn.map(Turn::player);
        for p in self.players.iter_mut() {
            p.set_current(Some(p.id()) == current);
        }
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        self.emit(GameEvent::PhaseChanged { from, to });
    }
}
