//! Greedy longest-first matching of gazetteer names in a sentence.
//!
//! Every window length from `max_window` down to `min_window` is scanned
//! left to right. Accepted spans go into a per-sentence [`IntervalTree`],
//! and later (shorter) windows skip straight past anything already claimed.
//! Longer names therefore always win, and no two matches overlap.

use geo_tagger_types::MatchRecord;
use tracing::debug;

use crate::config::TaggerConfig;
use crate::error::Result;
use crate::interval::Interval;
use crate::interval_tree::IntervalTree;
use crate::resolver::{RecognitionContext, Resolver};

/// One accepted span and the code it resolved to. Offsets are character
/// offsets into the sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub span: Interval,
    pub text: String,
    pub code: String,
}

/// A match tagged with the index of the sentence it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceMatch {
    pub sentence: usize,
    pub matched: Match,
}

impl From<SentenceMatch> for MatchRecord {
    fn from(m: SentenceMatch) -> Self {
        MatchRecord {
            sentence: m.sentence,
            start: m.matched.span.start(),
            end: m.matched.span.end(),
            text: m.matched.text,
            code: m.matched.code,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tagger<'g> {
    resolver: Resolver<'g>,
    max_window: usize,
    min_window: usize,
}

impl<'g> Tagger<'g> {
    /// Fails with [`Error::Config`](crate::Error::Config) when the window
    /// bounds do not pass [`TaggerConfig::validate`].
    pub fn new(resolver: Resolver<'g>, config: &TaggerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Tagger {
            resolver,
            max_window: config.max_window,
            min_window: config.min_window,
        })
    }

    /// Tag a sequence of sentences belonging to one document, starting from
    /// an empty recognition context.
    pub fn tag_document<'s, I>(&self, sentences: I, origin: Option<&str>) -> Vec<SentenceMatch>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut ctx = RecognitionContext::new();
        let mut out = Vec::new();
        for (sentence, text) in sentences.into_iter().enumerate() {
            for matched in self.tag_sentence(text, origin, &mut ctx) {
                out.push(SentenceMatch { sentence, matched });
            }
        }
        out
    }

    /// Tag one sentence. Matches come out in emission order: by window
    /// length (longest first), then left to right.
    pub fn tag_sentence(
        &self,
        sentence: &str,
        origin: Option<&str>,
        ctx: &mut RecognitionContext,
    ) -> Vec<Match> {
        let chars: Vec<char> = sentence.chars().collect();
        let len = chars.len();
        let mut claimed = IntervalTree::new();
        let mut matches = Vec::new();

        // Longest window: plain scan, nothing can be claimed yet.
        let width = self.max_window;
        let mut j = 0;
        while j + width <= len {
            let span = Interval::with_len(j, width);
            match self.try_match(&chars, span, origin, ctx) {
                Some(m) => {
                    claimed.insert(span);
                    matches.push(m);
                    j = span.end() + 1;
                }
                None => j += 1,
            }
        }

        for width in (self.min_window..self.max_window).rev() {
            let mut j = claimed.next_available(&Interval::with_len(0, width));
            while j + width <= len {
                let span = Interval::with_len(j, width);
                let next = claimed.next_available(&span);
                if next != j {
                    j = next;
                    continue;
                }
                match self.try_match(&chars, span, origin, ctx) {
                    Some(m) => {
                        debug_assert!(
                            claimed.first_overlap(&span).is_none(),
                            "{span} overlaps a claimed span"
                        );
                        claimed.insert(span);
                        matches.push(m);
                        j = span.end() + 1;
                    }
                    None => j += 1,
                }
            }
        }

        matches
    }

    fn try_match(
        &self,
        chars: &[char],
        span: Interval,
        origin: Option<&str>,
        ctx: &mut RecognitionContext,
    ) -> Option<Match> {
        let text: String = chars[span.start()..=span.end()].iter().collect();
        let code = self.resolver.resolve(&text, origin, ctx)?;
        debug!(%span, text = %text, code, "matched");
        Some(Match {
            span,
            text,
            code: code.to_string(),
        })
    }
}
