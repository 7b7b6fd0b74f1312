use std::fmt::Write as _;
use std::sync::Arc;

use game_core::{RoundEvent, RoundEventHandler};
use game_types::{
    AdRewardStatus, DifficultyLevel, GameError, GameStatistics, JokerCounts, JokerEffect,
    JokerKind, LetterStatus, LossReason, PlayerCommand, RoundOutcome, RoundSnapshot,
};
use thiserror::Error;

use crate::rewards::{AdRewardProvider, RewardSchedule, claim_ad_reward};
use crate::session::GameSession;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command ':{0}'")]
    UnknownCommand(String),
    #[error("{0}")]
    UnknownJoker(String),
    #[error("{0}")]
    InvalidLevel(GameError),
    #[error("':ad' needs a joker kind")]
    MissingJokerKind,
}

/// Turn one input line into commands.
///
/// An empty line submits, `-` deletes (repeatable), `!name` uses a joker,
/// `:word` runs a session command, anything else is typed letter by letter.
pub fn parse_command(line: &str) -> Result<Vec<PlayerCommand>, CommandError> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(vec![PlayerCommand::SubmitGuess]);
    }
    if line.chars().all(|c| c == '-') {
        return Ok(line.chars().map(|_| PlayerCommand::DeleteLetter).collect());
    }
    if let Some(joker) = line.strip_prefix('!') {
        let kind = joker.parse().map_err(CommandError::UnknownJoker)?;
        return Ok(vec![PlayerCommand::UseJoker { kind }]);
    }
    if let Some(rest) = line.strip_prefix(':') {
        return parse_session_command(rest).map(|command| vec![command]);
    }

    Ok(line
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|letter| PlayerCommand::TypeLetter { letter })
        .collect())
}

fn parse_session_command(input: &str) -> Result<PlayerCommand, CommandError> {
    let mut parts = input.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let argument = parts.next();

    match name.as_str() {
        "new" => {
            let level = argument
                .map(str::parse::<DifficultyLevel>)
                .transpose()
                .map_err(CommandError::InvalidLevel)?;
            Ok(PlayerCommand::StartRound { level })
        }
        "ad" => {
            let kind = argument
                .ok_or(CommandError::MissingJokerKind)?
                .parse::<JokerKind>()
                .map_err(CommandError::UnknownJoker)?;
            Ok(PlayerCommand::WatchAd { kind })
        }
        "stats" => Ok(PlayerCommand::ShowStatistics),
        "quit" | "q" => Ok(PlayerCommand::Quit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Quiet,
    Say(String),
    Quit,
}

/// Runs parsed commands against a session.
pub struct Terminal {
    session: GameSession,
    ads: Arc<dyn AdRewardProvider>,
    schedule: RewardSchedule,
    default_level: DifficultyLevel,
}

impl Terminal {
    pub fn new(
        session: GameSession,
        ads: Arc<dyn AdRewardProvider>,
        schedule: RewardSchedule,
        default_level: DifficultyLevel,
    ) -> Self {
        Self {
            session,
            ads,
            schedule,
            default_level,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub async fn execute(&self, command: PlayerCommand) -> Reply {
        match command {
            PlayerCommand::TypeLetter { letter } => match self.session.append_letter(letter).await {
                Ok(_) => Reply::Quiet,
                Err(reason) => Reply::Say(format!("'{}' ignored: {}", letter, reason)),
            },
            PlayerCommand::DeleteLetter => {
                self.session.remove_last_letter().await;
                Reply::Quiet
            }
            PlayerCommand::SubmitGuess => match self.session.submit_guess().await {
                Ok(_) => Reply::Quiet,
                Err(GameError::UnknownWord { word }) => {
                    Reply::Say(format!("{} is not in the word list", word))
                }
                Err(e) => Reply::Say(e.to_string()),
            },
            PlayerCommand::UseJoker { kind } => match self.session.use_joker(kind).await {
                Ok(effect) => Reply::Say(describe_effect(&effect)),
                Err(e) => Reply::Say(e.to_string()),
            },
            PlayerCommand::StartRound { level } => {
                let level = level.unwrap_or(self.default_level);
                match self.session.start_new_round(level.profile()).await {
                    Ok(_) => Reply::Quiet,
                    Err(e) => Reply::Say(format!("Could not start a round: {}", e)),
                }
            }
            PlayerCommand::WatchAd { kind } => {
                let result = claim_ad_reward(
                    self.ads.as_ref(),
                    self.session.inventory(),
                    kind,
                    self.schedule.ad_reward,
                )
                .await;
                match result {
                    Ok(AdRewardStatus::Granted) => {
                        Reply::Say(format!("+{} {}", self.schedule.ad_reward, kind))
                    }
                    Ok(AdRewardStatus::Declined) => Reply::Say("Ad skipped, no reward".to_string()),
                    Ok(AdRewardStatus::Unavailable) => {
                        Reply::Say("No ad available right now".to_string())
                    }
                    Err(e) => Reply::Say(e.to_string()),
                }
            }
            PlayerCommand::ShowStatistics => {
                let stats = self.session.statistics().statistics().await;
                Reply::Say(render_statistics(&stats))
            }
            PlayerCommand::Quit => Reply::Quit,
        }
    }

    /// Current board, or a prompt to start when no round exists.
    pub async fn board(&self) -> String {
        let jokers = self.session.inventory().counts().await;
        match self.session.snapshot().await {
            Some(snapshot) => render_snapshot(&snapshot, &jokers),
            None => "No round yet. Type ':new' to start.".to_string(),
        }
    }
}

pub fn describe_effect(effect: &JokerEffect) -> String {
    match effect {
        JokerEffect::LetterRevealed(revealed) => {
            format!("Letter {} is {}", revealed.position + 1, revealed.letter)
        }
        JokerEffect::NothingToReveal => "Every letter is already revealed".to_string(),
        JokerEffect::LettersEliminated { letters } if letters.is_empty() => {
            "No more letters to eliminate".to_string()
        }
        JokerEffect::LettersEliminated { letters } => {
            format!("Eliminated {} letters", letters.len())
        }
        JokerEffect::HintShown(hint) => format!("Hint: {}", hint),
        JokerEffect::TimeAdded {
            seconds,
            remaining_secs,
        } => format!("+{}s, {}s left", seconds, remaining_secs),
    }
}

fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn render_snapshot(snapshot: &RoundSnapshot, jokers: &JokerCounts) -> String {
    let mut out = String::new();
    let length = snapshot.difficulty.word_length;

    for guess in &snapshot.submitted_guesses {
        for letter in &guess.letters {
            let cell = match letter.status {
                LetterStatus::Correct => format!("[{}]", letter.letter),
                LetterStatus::WrongPosition => format!("({})", letter.letter),
                LetterStatus::Absent => format!(" {} ", letter.letter),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }

    let mut rows = snapshot.submitted_guesses.len();
    if snapshot.outcome == RoundOutcome::InProgress {
        for slot in snapshot.input_row() {
            match slot {
                Some(letter) => {
                    let _ = write!(out, " {} ", letter);
                }
                None => out.push_str(" _ "),
            }
        }
        out.push('\n');
        rows += 1;
    }
    for _ in rows..snapshot.difficulty.max_guesses as usize {
        out.push_str(&" . ".repeat(length));
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Time {} | Guesses left {} | Jokers: reveal {}, eliminate {}, hint {}, time {}",
        format_clock(snapshot.remaining_secs),
        snapshot.guesses_left(),
        jokers.reveal_letter,
        jokers.eliminate_letters,
        jokers.show_hint,
        jokers.extra_time,
    );

    if !snapshot.eliminated_letters.is_empty() {
        let letters: Vec<String> = snapshot
            .eliminated_letters
            .iter()
            .map(char::to_string)
            .collect();
        let _ = writeln!(out, "Eliminated: {}", letters.join(" "));
    }
    if let Some(hint) = &snapshot.hint {
        let _ = writeln!(out, "Hint: {}", hint);
    }
    if snapshot.invalid_word_alert {
        out.push_str("Not a word!\n");
    }

    let target = snapshot.target_word.as_deref().unwrap_or_default();
    match (snapshot.outcome, snapshot.loss_reason) {
        (RoundOutcome::Won, _) => {
            let _ = writeln!(out, "You won! The word was {}", target);
        }
        (RoundOutcome::Lost, Some(LossReason::TimeExpired)) => {
            let _ = writeln!(out, "Time's up. The word was {}", target);
        }
        (RoundOutcome::Lost, _) => {
            let _ = writeln!(out, "Out of guesses. The word was {}", target);
        }
        (RoundOutcome::InProgress, _) => {}
    }

    out
}

pub fn render_statistics(stats: &GameStatistics) -> String {
    let mut out = format!(
        "Played {} | Won {:.0}% | Streak {} (best {})\n",
        stats.games_played,
        stats.win_percentage(),
        stats.current_streak,
        stats.max_streak
    );
    for (guesses, wins) in &stats.guess_distribution {
        let _ = writeln!(out, "{:>2}: {} {}", guesses, "#".repeat(*wins as usize), wins);
    }
    out
}

/// Prints rounds the clock ends, since nothing else is waiting on stdin's
/// behalf when that happens.
#[derive(Debug, Default)]
pub struct ClockNotifier;

impl RoundEventHandler for ClockNotifier {
    fn handle_event(&mut self, event: RoundEvent) {
        if let RoundEvent::RoundFinished { summary } = event {
            if summary.loss_reason == Some(LossReason::TimeExpired) {
                println!("\nTime's up! The word was {}", summary.target_word);
            }
        }
    }
}
