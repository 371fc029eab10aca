//! Interactive questionnaire on stdin/stdout.
//!
//! Every step accepts `back` and `quit`; end of input counts as `quit`. A blank
//! line keeps the current answer. The last line written is the JSON command outcome.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use serde::Serialize;
use soundrush_core::audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink,
};
use soundrush_core::config::{AppConfig, LoadOptions};
use soundrush_core::domain::answers::{
    Answers, AudioSource, BudgetBand, EventType, GuestBucket, Needs, UnknownOption, Venue,
};
use soundrush_core::flows::{QuestionStep, Questionnaire, StepEvent};
use soundrush_core::quote::{estimate, InMemoryPrefillSink, QuoteDraft, QuoteEstimate, QuotePrefill};
use soundrush_db::{connect_from_config, migrations, QuoteDraftRepository, SqlQuoteDraftRepository};
use uuid::Uuid;

use crate::commands::{current_thread_runtime, CommandResult};

#[derive(Clone, Copy, Debug, Default)]
pub struct AssistantOptions {
    /// Persist the finished questionnaire as a quote draft.
    pub save: bool,
}

#[derive(Debug, Serialize)]
pub struct AssistantReport {
    pub session_id: String,
    pub prefill: QuotePrefill,
    pub estimate: QuoteEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
    pub audit_events: Vec<String>,
}

pub fn run(options: AssistantOptions) -> CommandResult {
    let stdin = io::stdin();
    run_with_io(stdin.lock(), io::stdout(), options)
}

pub fn run_with_io<R, W>(input: R, output: W, options: AssistantOptions) -> CommandResult
where
    R: BufRead,
    W: Write,
{
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "assistant",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let mut console = Console { input, output };
    match drive(&mut console, &config, options) {
        Ok(result) => result,
        Err(error) => CommandResult::failure("assistant", "io", error.to_string(), 1),
    }
}

enum Move {
    Next,
    Back,
    Stay,
    Quit,
}

enum Reply<T> {
    Value(T),
    Blank,
    Back,
    Quit,
    Invalid,
}

struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    fn ask(&mut self, label: &str) -> io::Result<Reply<String>> {
        write!(self.output, "{label} > ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Reply::Quit);
        }
        let trimmed = line.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "" => Reply::Blank,
            "back" => Reply::Back,
            "quit" | "exit" => Reply::Quit,
            _ => Reply::Value(trimmed.to_string()),
        })
    }

    /// Numbered menu; accepts either the number or the option name.
    fn choose<T: Choice>(&mut self, label: &str, current: Option<T>) -> io::Result<Reply<T>> {
        let options = T::options();
        for (position, option) in options.iter().enumerate() {
            let marker = if Some(*option) == current { "*" } else { " " };
            self.say(format!(" {marker}{}. {}", position + 1, option.name()))?;
        }

        let reply = match self.ask(label)? {
            Reply::Value(raw) => raw,
            Reply::Blank => return Ok(Reply::Blank),
            Reply::Back => return Ok(Reply::Back),
            Reply::Quit => return Ok(Reply::Quit),
            Reply::Invalid => return Ok(Reply::Invalid),
        };

        if let Ok(number) = reply.parse::<usize>() {
            return match number.checked_sub(1).and_then(|index| options.get(index)) {
                Some(option) => Ok(Reply::Value(*option)),
                None => {
                    self.say(format!("! pick a number between 1 and {}", options.len()))?;
                    Ok(Reply::Invalid)
                }
            };
        }

        match reply.parse::<T>() {
            Ok(option) => Ok(Reply::Value(option)),
            Err(error) => {
                self.say(format!("! {error}"))?;
                Ok(Reply::Invalid)
            }
        }
    }

    fn count(&mut self, label: &str) -> io::Result<Reply<u32>> {
        Ok(match self.ask(label)? {
            Reply::Value(raw) => match raw.parse::<u32>() {
                Ok(value) => Reply::Value(value),
                Err(_) => {
                    self.say(format!("! `{raw}` is not a whole number"))?;
                    Reply::Invalid
                }
            },
            Reply::Blank => Reply::Blank,
            Reply::Back => Reply::Back,
            Reply::Quit => Reply::Quit,
            Reply::Invalid => Reply::Invalid,
        })
    }
}

trait Choice: Copy + PartialEq + FromStr<Err = UnknownOption> {
    fn options() -> Vec<Self>;
    fn name(&self) -> &'static str;
}

macro_rules! impl_choice {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Choice for $ty {
                fn options() -> Vec<Self> {
                    Self::ALL.to_vec()
                }

                fn name(&self) -> &'static str {
                    self.as_str()
                }
            }
        )+
    };
}

impl_choice!(EventType, GuestBucket, Venue, AudioSource, BudgetBand);

/// Maps a reply onto a move, storing the value through `store` when one was given.
fn settle<T>(
    reply: Reply<T>,
    questionnaire: &mut Questionnaire,
    store: impl FnOnce(&mut Answers, T),
) -> Move {
    match reply {
        Reply::Value(value) => {
            questionnaire.update(|answers| store(answers, value));
            Move::Next
        }
        Reply::Blank => Move::Next,
        Reply::Back => Move::Back,
        Reply::Quit => Move::Quit,
        Reply::Invalid => Move::Stay,
    }
}

/// Like [`settle`] but for one field of a multi-field step: a value does not advance.
fn field<T>(
    reply: Reply<T>,
    questionnaire: &mut Questionnaire,
    store: impl FnOnce(&mut Answers, T),
) -> Option<Move> {
    match settle(reply, questionnaire, store) {
        Move::Next => None,
        other => Some(other),
    }
}

fn drive<R, W>(
    console: &mut Console<R, W>,
    config: &AppConfig,
    options: AssistantOptions,
) -> io::Result<CommandResult>
where
    R: BufRead,
    W: Write,
{
    let sink = InMemoryAuditSink::default();
    let session_id = Uuid::new_v4().to_string();
    let audit = AuditContext::for_session(session_id, "cli");
    let mut questionnaire = Questionnaire::new();
    let last_question = QuestionStep::ALL.len() - 1;

    console.say("SoundRush equipment assistant (type `back` to go back, `quit` to leave)")?;

    loop {
        let step = questionnaire.step();
        if !step.is_terminal() {
            console.say(format!("[{}/{last_question}] {}", step.index() + 1, step.prompt()))?;
        }

        let movement = match step {
            QuestionStep::EventType => {
                let reply = console.choose(step.label(), questionnaire.answers().event_type)?;
                settle(reply, &mut questionnaire, |answers, value| answers.event_type = Some(value))
            }
            QuestionStep::GuestCount => {
                let reply = console.choose(step.label(), questionnaire.answers().guest_count)?;
                settle(reply, &mut questionnaire, |answers, value| answers.guest_count = Some(value))
            }
            QuestionStep::Venue => {
                let reply = console.choose(step.label(), questionnaire.answers().venue)?;
                settle(reply, &mut questionnaire, |answers, value| answers.venue = Some(value))
            }
            QuestionStep::AudioSource => {
                let reply = console.choose(step.label(), questionnaire.answers().audio_source)?;
                settle(reply, &mut questionnaire, |answers, value| {
                    answers.audio_source = Some(value)
                })
            }
            QuestionStep::NeedsAndMics => needs_and_mics(console, &mut questionnaire)?,
            QuestionStep::Logistics => logistics(console, &mut questionnaire)?,
            QuestionStep::Result => {
                match result_screen(console, &mut questionnaire, config, &sink, &audit, options)? {
                    Some(outcome) => return Ok(outcome),
                    None => continue,
                }
            }
        };

        match movement {
            Move::Next => {
                if let Err(error) = questionnaire.apply_with_audit(StepEvent::Next, &sink, &audit)
                {
                    console.say(format!("! {}", error.user_message()))?;
                }
            }
            Move::Back => {
                let _ = questionnaire.apply_with_audit(StepEvent::Prev, &sink, &audit);
            }
            Move::Stay => {}
            Move::Quit => return Ok(aborted()),
        }
    }
}

fn needs_and_mics<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    questionnaire: &mut Questionnaire,
) -> io::Result<Move> {
    let needs = match console.ask("Needs (music, speeches, dj; comma separated)")? {
        Reply::Value(raw) => match parse_needs(&raw) {
            Ok(needs) => Reply::Value(needs),
            Err(unknown) => {
                console.say(format!("! unknown need `{unknown}` (expected music|speeches|dj)"))?;
                Reply::Invalid
            }
        },
        Reply::Blank => Reply::Blank,
        Reply::Back => Reply::Back,
        Reply::Quit => Reply::Quit,
        Reply::Invalid => Reply::Invalid,
    };
    if let Some(movement) = field(needs, questionnaire, |answers, needs| answers.needs = needs) {
        return Ok(movement);
    }

    let wired = console.count("Wired microphones")?;
    if let Some(movement) = field(wired, questionnaire, |answers, count| answers.mics.wired = count)
    {
        return Ok(movement);
    }

    let wireless = console.count("Wireless microphones")?;
    Ok(settle(wireless, questionnaire, |answers, count| answers.mics.wireless = count))
}

fn logistics<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    questionnaire: &mut Questionnaire,
) -> io::Result<Move> {
    let postal_code = console.ask("Postal code")?;
    if let Some(movement) =
        field(postal_code, questionnaire, |answers, value| answers.postal_code = value)
    {
        return Ok(movement);
    }

    let date = console.ask("Event date and time (YYYY-MM-DDTHH:MM, optional)")?;
    if let Some(movement) =
        field(date, questionnaire, |answers, value| answers.event_date_time = Some(value))
    {
        return Ok(movement);
    }

    let budget = console.choose("Budget (optional)", questionnaire.answers().budget)?;
    Ok(settle(budget, questionnaire, |answers, value| answers.budget = Some(value)))
}

fn parse_needs(raw: &str) -> Result<Needs, String> {
    let mut needs = Needs { music: false, speeches: false, dj: false };
    for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        match token.to_ascii_lowercase().as_str() {
            "music" => needs.music = true,
            "speeches" | "speech" => needs.speeches = true,
            "dj" => needs.dj = true,
            _ => return Err(token.to_string()),
        }
    }
    Ok(needs)
}

/// Shows the recommendation and waits for a decision. `None` means the session goes on.
fn result_screen<R, W>(
    console: &mut Console<R, W>,
    questionnaire: &mut Questionnaire,
    config: &AppConfig,
    sink: &InMemoryAuditSink,
    audit: &AuditContext,
    options: AssistantOptions,
) -> io::Result<Option<CommandResult>>
where
    R: BufRead,
    W: Write,
{
    if let Ok(prefill) = questionnaire.prefill() {
        let recommendation = &prefill.recommendation;
        console.say(QuestionStep::Result.prompt())?;
        console.say(format!(
            "  speakers: {} x {}",
            recommendation.speaker_count,
            recommendation.speaker_model.as_str()
        ))?;
        console.say(format!("  subwoofers: {}", recommendation.subwoofer_count))?;
        console.say(format!("  console: {}", recommendation.console_tier.as_str()))?;
        console.say(format!(
            "  microphones: {} wired, {} wireless",
            recommendation.mic_wired_count, recommendation.mic_wireless_count
        ))?;
        for reason in &recommendation.reasons {
            console.say(format!("  - {reason}"))?;
        }
        console.say(format!("  delivery zone: {}", prefill.zone.label()))?;
        if prefill.urgent {
            console.say("  urgent: the event is less than 48 hours away")?;
        }
    }

    let choice = match console.ask("apply / restart / back / quit")? {
        Reply::Value(raw) => raw.to_ascii_lowercase(),
        Reply::Back => {
            let _ = questionnaire.apply_with_audit(StepEvent::Prev, sink, audit);
            return Ok(None);
        }
        Reply::Quit => return Ok(Some(aborted())),
        Reply::Blank | Reply::Invalid => String::new(),
    };

    match choice.as_str() {
        "apply" => apply(console, questionnaire, config, sink, audit, options).map(Some),
        "restart" => {
            let _ = questionnaire.apply_with_audit(StepEvent::Restart, sink, audit);
            Ok(None)
        }
        _ => {
            console.say("! choose apply, restart, back or quit")?;
            Ok(None)
        }
    }
}

fn apply<R, W>(
    console: &mut Console<R, W>,
    questionnaire: &Questionnaire,
    config: &AppConfig,
    sink: &InMemoryAuditSink,
    audit: &AuditContext,
    options: AssistantOptions,
) -> io::Result<CommandResult>
where
    R: BufRead,
    W: Write,
{
    let prefills = InMemoryPrefillSink::default();
    let prefill = match questionnaire.apply_to_quote(&prefills) {
        Ok(prefill) => prefill,
        Err(error) => {
            return Ok(CommandResult::failure("assistant", "invalid_state", error.to_string(), 1));
        }
    };
    let estimate = estimate(&prefill, &config.pricing);
    sink.emit(
        AuditEvent::new(audit, "quote.prefill_applied", AuditCategory::Quote, AuditOutcome::Success)
            .with_metadata("zone", prefill.zone.as_str())
            .with_metadata("total", estimate.total.to_string()),
    );
    console.say(format!("  indicative total: {} {}", estimate.total, estimate.currency))?;

    let draft_id = if options.save {
        let draft = match QuoteDraft::new(questionnaire.answers().clone(), prefill.advice(), &estimate) {
            Ok(draft) => draft,
            Err(error) => {
                return Ok(CommandResult::failure(
                    "assistant",
                    "incomplete_answers",
                    error.to_string(),
                    1,
                ));
            }
        };
        let id = draft.id.to_string();
        if let Err(failure) = persist(config, draft) {
            return Ok(failure);
        }
        sink.emit(
            AuditEvent::new(
                audit,
                "quote.draft_saved",
                AuditCategory::Persistence,
                AuditOutcome::Success,
            )
            .with_metadata("draft_id", id.clone()),
        );
        console.say(format!("  saved quote draft {id}"))?;
        Some(id)
    } else {
        None
    };

    let message = match &draft_id {
        Some(id) => format!("prefill applied and saved as {id}"),
        None => "prefill applied".to_string(),
    };
    let report = AssistantReport {
        session_id: audit.session_id.clone().unwrap_or_default(),
        prefill,
        estimate,
        draft_id,
        audit_events: sink.event_types(),
    };

    Ok(CommandResult::success_with_data("assistant", message, report))
}

fn persist(config: &AppConfig, draft: QuoteDraft) -> Result<(), CommandResult> {
    let runtime = current_thread_runtime("assistant")?;

    let result = runtime.block_on(async {
        let pool = connect_from_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        let repository = SqlQuoteDraftRepository::new(pool.clone());
        repository.save(draft).await.map_err(|error| ("persistence", error.to_string(), 1u8))?;
        pool.close().await;
        Ok::<(), (&'static str, String, u8)>(())
    });

    result.map_err(|(error_class, message, exit_code)| {
        CommandResult::failure("assistant", error_class, message, exit_code)
    })
}

fn aborted() -> CommandResult {
    CommandResult::failure("assistant", "aborted", "questionnaire left before completion", 1)
}
