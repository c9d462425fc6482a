//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;
use wikialign::align::{KeyColumn, Punctuation};
use wikialign::pipelines::OnError;
use wikialign::translation::OutputMode;

#[derive(Debug, StructOpt)]
#[structopt(name = "wikialign", about = "parallel corpus generation tool.")]
pub struct Wikialign {
    #[structopt(
        short = "v",
        parse(from_occurrences),
        help = "raise log verbosity (-v: debug, -vv: trace). RUST_LOG takes precedence."
    )]
    pub verbose: u8,
    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
/// Holds every command that is callable by the `wikialign` command.
pub enum Command {
    #[structopt(about = "Extract sentence records from dump files")]
    Parse(Parse),
    #[structopt(about = "Add the url of foreign articles to sentence records")]
    Urls(Urls),
    #[structopt(about = "Match parsed sentences against alignment exports")]
    Align(Align),
    #[structopt(about = "Machine-translate a column of a TSV file")]
    Translate(Translate),
    #[structopt(about = "Re-segment a translated column section by section")]
    Resegment(Resegment),
    #[structopt(about = "Write per-article document pairs")]
    ParallelDocs(ParallelDocs),
}

#[derive(Debug, StructOpt)]
pub struct Parse {
    #[structopt(parse(from_os_str), help = "dump directory (searched recursively)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "sentence record file")]
    pub dst: PathBuf,
    #[structopt(short = "l", long = "lang", default_value = "en", help = "dump language")]
    pub lang: String,
    #[structopt(
        long = "match-lang",
        requires_all = &["langlinks", "no-match"],
        help = "only keep articles that have a title in this language"
    )]
    pub match_lang: Option<String>,
    #[structopt(long = "langlinks", parse(from_os_str), help = "langlinks SQLite database")]
    pub langlinks: Option<PathBuf>,
    #[structopt(
        long = "no-match",
        parse(from_os_str),
        help = "sentence record file for articles without a match"
    )]
    pub no_match: Option<PathBuf>,
    #[structopt(short = "w", long = "workers", help = "number of workers. Default is the number of cpus.")]
    pub workers: Option<usize>,
    #[structopt(long = "files-per-worker", default_value = "1")]
    pub files_per_worker: usize,
    #[structopt(
        long = "on-error",
        default_value = "abort",
        help = "what to do when a file fails (abort|skip)"
    )]
    pub on_error: OnError,
    #[structopt(
        long = "start-batch",
        default_value = "0",
        help = "resume at this batch, appending to existing outputs"
    )]
    pub start_batch: usize,
    #[structopt(long = "segmenter", default_value = "unicode", help = "unicode|line")]
    pub segmenter: String,
    #[structopt(long = "quote", default_value = "\"")]
    pub quote: char,
}

#[derive(Debug, StructOpt)]
pub struct Urls {
    #[structopt(parse(from_os_str), help = "dump directory of the foreign language")]
    pub document_dir: PathBuf,
    #[structopt(parse(from_os_str), help = "sentence record file")]
    pub input: PathBuf,
    #[structopt(parse(from_os_str), help = "annotated sentence record file")]
    pub output: PathBuf,
    #[structopt(
        long = "title-column",
        default_value = "7",
        help = "column holding the foreign title"
    )]
    pub title_column: usize,
    #[structopt(long = "quote", default_value = "\"")]
    pub quote: char,
}

#[derive(Debug, StructOpt)]
pub struct Align {
    #[structopt(
        long = "parsed",
        parse(from_os_str),
        required = true,
        help = "sentence record files"
    )]
    pub parsed: Vec<PathBuf>,
    #[structopt(
        long = "alignments",
        parse(from_os_str),
        required = true,
        help = "alignment exports (first, second, score)"
    )]
    pub alignments: Vec<PathBuf>,
    #[structopt(parse(from_os_str), help = "matched rows")]
    pub output: PathBuf,
    #[structopt(long = "sentence-column", default_value = "6")]
    pub sentence_column: usize,
    #[structopt(
        long = "key",
        default_value = "second",
        help = "alignment column matched against parsed sentences (first|second)"
    )]
    pub key: KeyColumn,
    #[structopt(long = "fuzzy", help = "ignore punctuation, case and spacing")]
    pub fuzzy: bool,
    #[structopt(
        long = "punctuation",
        default_value = "ascii",
        help = "punctuation removed in fuzzy mode (keep|ascii|unicode)"
    )]
    pub punctuation: Punctuation,
    #[structopt(long = "keep-case", help = "do not lowercase in fuzzy mode")]
    pub keep_case: bool,
    #[structopt(long = "keep-spacing", help = "do not collapse whitespace in fuzzy mode")]
    pub keep_spacing: bool,
    #[structopt(long = "quote", default_value = "\"")]
    pub quote: char,
}

#[derive(Debug, StructOpt)]
pub struct Translate {
    #[structopt(parse(from_os_str))]
    pub input: PathBuf,
    #[structopt(parse(from_os_str))]
    pub output: PathBuf,
    #[structopt(short = "c", long = "column", help = "column to translate")]
    pub column: usize,
    #[structopt(short = "s", long = "source-lang")]
    pub source_lang: String,
    #[structopt(short = "t", long = "target-lang")]
    pub target_lang: String,
    #[structopt(long = "auth-key", env = "DEEPL_AUTH_KEY", hide_env_values = true)]
    pub auth_key: String,
    #[structopt(long = "free", help = "use the free API endpoint")]
    pub free: bool,
    #[structopt(long = "chunk-size", default_value = "25")]
    pub chunk_size: usize,
    #[structopt(
        long = "save",
        parse(from_os_str),
        help = "file receiving translations as they come"
    )]
    pub save: Option<PathBuf>,
    #[structopt(long = "resume", requires = "save", help = "skip translations already saved")]
    pub resume: bool,
    #[structopt(long = "pause-ms", help = "wait between two requests")]
    pub pause_ms: Option<u64>,
    #[structopt(long = "mode", default_value = "append", help = "append|parallel")]
    pub mode: OutputMode,
    #[structopt(long = "quote", default_value = "\"")]
    pub quote: char,
}

#[derive(Debug, StructOpt)]
pub struct Resegment {
    #[structopt(parse(from_os_str))]
    pub input: PathBuf,
    #[structopt(parse(from_os_str))]
    pub output: PathBuf,
    #[structopt(long = "text-column", help = "column to re-segment")]
    pub text_column: usize,
    #[structopt(
        long = "aligned-column",
        help = "column overwritten with NOT_PARALLEL"
    )]
    pub aligned_column: Option<usize>,
    #[structopt(short = "l", long = "lang", default_value = "de")]
    pub lang: String,
    #[structopt(long = "segmenter", default_value = "unicode", help = "unicode|line")]
    pub segmenter: String,
    #[structopt(long = "quote", default_value = "\"")]
    pub quote: char,
}

#[derive(Debug, StructOpt)]
pub struct ParallelDocs {
    #[structopt(parse(from_os_str), help = "annotated corpus")]
    pub corpus: PathBuf,
    #[structopt(parse(from_os_str), help = "sentence record file of the foreign language")]
    pub foreign: PathBuf,
    #[structopt(parse(from_os_str), help = "output directory")]
    pub out_dir: PathBuf,
    #[structopt(long = "url-column", default_value = "8")]
    pub url_column: usize,
    #[structopt(long = "text-column", default_value = "9")]
    pub text_column: usize,
    #[structopt(long = "ext", default_value = "src")]
    pub ext: String,
    #[structopt(long = "foreign-ext", default_value = "tgt")]
    pub foreign_ext: String,
    #[structopt(long = "quote", default_value = "\"")]
    pub quote: char,
}
