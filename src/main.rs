//! # wikialign
//!
//! Sentence-level parallel corpus builder for extracted encyclopedia dumps.
//!
//! ## Getting started
//!
//! ```sh
//! wikialign 0.1.0
//! parallel corpus generation tool.
//!
//! USAGE:
//!     wikialign [FLAGS] <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     align            Match parsed sentences against alignment exports
//!     parallel-docs    Write per-article document pairs
//!     parse            Extract sentence records from dump files
//!     resegment        Re-segment a translated column section by section
//!     translate        Machine-translate a column of a TSV file
//!     urls             Add the url of foreign articles to sentence records
//! ```
use std::time::Duration;

use structopt::StructOpt;
use wikialign::align::{AlignFiles, Normalizer};
use wikialign::error::Error;
use wikialign::io::{RecordSink, Tsv};
use wikialign::pipelines::{ParseDocuments, ParseSummary, Pipeline};
use wikialign::processing;
use wikialign::resolve::LangLinks;
use wikialign::segment::{self, Segmenter};
use wikialign::translation::{BatchTranslator, DeepL, TranslationHandler, DEEPL_FREE_URL};
use wikialign::urls::TitleUrlIndex;

#[macro_use]
extern crate log;

mod cli;

fn tsv(quote: char) -> Result<Tsv, Error> {
    if quote.is_ascii() {
        Ok(Tsv::with_quote(quote as u8))
    } else {
        Err(Error::Custom(format!("quote must be an ascii character: {quote:?}")))
    }
}

fn segmenter(name: &str) -> Result<Box<dyn Segmenter + Send + Sync>, Error> {
    segment::by_name(name).ok_or_else(|| Error::Custom(format!("unknown segmenter {name:?}")))
}

fn init_logger(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn parse(p: cli::Parse) -> Result<ParseSummary, Error> {
    let tsv = tsv(p.quote)?;
    let mut pipeline = ParseDocuments::new(
        p.src,
        p.lang,
        segmenter(&p.segmenter)?,
        RecordSink::new(&p.dst, tsv),
    )
    .files_per_worker(p.files_per_worker)
    .on_error(p.on_error)
    .start_batch(p.start_batch);
    if let Some(workers) = p.workers {
        pipeline = pipeline.workers(workers);
    }

    match (p.match_lang, p.langlinks, p.no_match) {
        (Some(match_lang), Some(langlinks), Some(no_match)) => pipeline
            .resolve_with(
                LangLinks::new(&langlinks),
                match_lang,
                RecordSink::new(&no_match, tsv),
            )
            .run(),
        (None, _, _) => pipeline.run(),
        _ => Err(Error::Custom(
            "--match-lang needs both --langlinks and --no-match".to_string(),
        )),
    }
}

fn main() -> Result<(), Error> {
    let opt = cli::Wikialign::from_args();
    init_logger(opt.verbose);
    debug!("cli args\n{:#?}", opt);

    match opt.cmd {
        cli::Command::Parse(p) => {
            let summary = parse(p)?;
            info!(
                "{} files in {} batches: {} matched records, {} unmatched records",
                summary.files, summary.batches, summary.matched, summary.unmatched
            );
            for skipped in &summary.skipped {
                warn!("skipped {:?}", skipped);
            }
        }

        cli::Command::Urls(u) => {
            let index = TitleUrlIndex::build(&u.document_dir)?;
            index.annotate_file(&u.input, u.title_column, &u.output, tsv(u.quote)?)?;
        }

        cli::Command::Align(a) => {
            let normalizer = if a.fuzzy {
                Normalizer::fuzzy()
                    .with_punctuation(a.punctuation)
                    .with_lowercase(!a.keep_case)
                    .with_collapse_whitespace(!a.keep_spacing)
            } else {
                Normalizer::exact()
            };
            let align = AlignFiles {
                parsed: a.parsed,
                alignments: a.alignments,
                sentence_column: a.sentence_column,
                key: a.key,
                normalizer,
                tsv: tsv(a.quote)?,
            };
            let nb_matches = align.run(&a.output)?;
            info!("Wrote {} matched rows to {:?}", nb_matches, a.output);
        }

        cli::Command::Translate(t) => {
            let tsv = tsv(t.quote)?;
            let mut backend = DeepL::new(t.auth_key)?;
            if t.free {
                backend = backend.with_endpoint(DEEPL_FREE_URL)?;
            }

            let mut translator = BatchTranslator::new(backend)
                .chunk_size(t.chunk_size)
                .resume(t.resume)
                .tsv(tsv);
            if let Some(save) = &t.save {
                translator = translator.save_to(save);
            }
            if let Some(pause) = t.pause_ms {
                translator = translator.pause(Duration::from_millis(pause));
            }

            let handler = TranslationHandler::read_tsv(&t.input, tsv)?;
            let translated =
                handler.translate_column(t.column, &translator, &t.source_lang, &t.target_lang)?;
            handler.write(&translated, t.mode, &t.output)?;
        }

        cli::Command::Resegment(r) => {
            let resegment = processing::Resegment {
                text_column: r.text_column,
                aligned_column: r.aligned_column,
                lang: r.lang,
                tsv: tsv(r.quote)?,
            };
            resegment.run(&r.input, &r.output, segmenter(&r.segmenter)?.as_ref())?;
        }

        cli::Command::ParallelDocs(d) => {
            let mut docs =
                processing::ParallelDocs::new(d.url_column, d.text_column, d.ext, d.foreign_ext);
            docs.tsv = tsv(d.quote)?;
            docs.run(&d.corpus, &d.foreign, &d.out_dir)?;
        }
    };
    Ok(())
}
