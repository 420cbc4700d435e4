use super::questions::{Question, QuestionBank};
use crate::error::{Bfi2Error, Result};
use crate::types::{Likert, ResponseSet, NEUTRAL_RESPONSE, RESPONSE_MAX, RESPONSE_MIN};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Whoever answers the questionnaire: a language model behind an API, a
/// participant at a terminal, or a script in a test. Returns the raw reply;
/// turning it into a Likert value is the agent's job.
pub trait Responder {
    fn respond(&mut self, question: &Question) -> Result<String>;
}

/// Prompt shown for a single item.
pub fn survey_prompt(question: &Question) -> String {
    format!(
        "You are taking a personality survey. Answer the following question based on your personality and how you genuinely see yourself.\n\
         \n\
         Question: \"I am someone who {}\"\n\
         \n\
         Response options:\n\
         1 - Disagree strongly\n\
         2 - Disagree a little\n\
         3 - Neutral; no opinion\n\
         4 - Agree a little\n\
         5 - Agree strongly\n\
         \n\
         Based on your personality, which response (1-5) best describes you?\n\
         \n\
         IMPORTANT: Respond with ONLY a single number (1, 2, 3, 4, or 5). No explanation needed.",
        question.text.to_lowercase()
    )
}

/// Reads the answer from the first character of a reply.
pub fn parse_reply(reply: &str) -> Option<Likert> {
    let digit = reply.trim().chars().next()?.to_digit(10)?;
    let value = Likert::try_from(digit).ok()?;
    (RESPONSE_MIN..=RESPONSE_MAX).contains(&value).then_some(value)
}

pub struct PersonaAgent<R> {
    persona: String,
    responder: R,
}

impl<R: Responder> PersonaAgent<R> {
    pub fn new(persona: impl Into<String>, responder: R) -> Self {
        Self {
            persona: persona.into(),
            responder,
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Unusable replies become the neutral answer rather than an error.
    pub fn answer_question(&mut self, question: &Question) -> Result<Likert> {
        let reply = self.responder.respond(question)?;
        match parse_reply(&reply) {
            Some(answer) => Ok(answer),
            None => {
                warn!(
                    item = question.id,
                    reply = %reply.trim(),
                    "unusable reply, recording neutral answer"
                );
                Ok(NEUTRAL_RESPONSE)
            }
        }
    }

    pub fn take_survey(&mut self, bank: &QuestionBank) -> Result<ResponseSet> {
        info!(persona = %self.persona, questions = bank.len(), "starting survey");
        let mut responses = ResponseSet::new();
        for question in bank.iter() {
            let answer = self.answer_question(question)?;
            debug!(item = question.id, domain = %question.domain, answer, "answered");
            responses.insert(question.id, answer);
        }
        info!(persona = %self.persona, answered = responses.len(), "survey complete");
        Ok(responses)
    }

    pub fn into_responder(self) -> R {
        self.responder
    }
}

/// A participant answering on a terminal. Replies that are not a number from
/// 1 to 5 are asked again; end of input aborts the survey.
pub struct StdinResponder<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> StdinResponder<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> O {
        self.output
    }
}

impl<I: BufRead, O: Write> Responder for StdinResponder<I, O> {
    fn respond(&mut self, question: &Question) -> Result<String> {
        writeln!(self.output, "\nQ{}. {}", question.id, survey_prompt(question))?;
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Bfi2Error::ResponderClosed(question.id));
            }
            if parse_reply(&line).is_some() {
                return Ok(line);
            }
            writeln!(self.output, "Please answer with a single number from 1 to 5.")?;
        }
    }
}
