//! Alignment stage.

use crate::backend::{Aligner, ModelResource, ReleaseGuard};
use crate::defaults;
use crate::document::Transcript;
use crate::error::Result;
use crate::events::EventSink;
use crate::options::ExecutionOptions;
use crate::stages::ExecutionContext;

/// Runs the alignment collaborator over the transcribed segments, producing
/// an aligned-shape document.
///
/// The alignment language is the detected language from the transcript,
/// falling back to the requested language, then to English. An unsupported
/// language is surfaced as a fatal error, never swallowed.
pub fn run(
    ctx: &mut ExecutionContext<'_>,
    aligner: &dyn Aligner,
    prior: &Transcript,
    options: &ExecutionOptions,
    events: &dyn EventSink,
) -> Result<Transcript> {
    let language = prior
        .language
        .clone()
        .or_else(|| options.language.clone())
        .unwrap_or_else(|| defaults::FALLBACK_LANGUAGE.to_string());

    events.log(&format!("Aligning word-level timestamps (language: {language})..."));
    let audio = ctx.audio()?;

    let _release = ReleaseGuard(aligner as &dyn ModelResource);
    let mut document = aligner.align(&prior.segments, &language, &audio)?;

    // The collaborator only returns segments; keep the language on the
    // document so later stages and checkpoints retain it.
    if document.language.is_none() {
        document.language = Some(language);
    }

    events.log("Alignment completed.");
    Ok(document)
}
