//! Call-stack capture and filtering
//!
//! The stack is read through the [`FrameSource`] trait so the filtering and
//! formatting rules can run against a real backtrace ([`BacktraceSource`])
//! or a hand-built list of frames.
//!
//! A rendered callstack is a single string of `short_file:line` tokens
//! joined by `", "`, innermost call first.

/// One resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: String,
    pub line: u32,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// Stack introspection capability
///
/// `frame(i)` returns the `i`-th frame counted from the innermost caller,
/// or `None` once the stack is exhausted.
pub trait FrameSource {
    fn frame(&self, index: usize) -> Option<Frame>;
}

impl FrameSource for [Frame] {
    fn frame(&self, index: usize) -> Option<Frame> {
        self.get(index).cloned()
    }
}

impl FrameSource for Vec<Frame> {
    fn frame(&self, index: usize) -> Option<Frame> {
        self.as_slice().frame(index)
    }
}

/// Symbol prefixes of frames that belong to the capture machinery itself
const CAPTURE_PREFIXES: [&str; 2] = ["backtrace::", concat!(env!("CARGO_CRATE_NAME"), "::")];

/// Snapshot of the calling thread's stack
///
/// Inlined frames are flattened into their own entries and frames without
/// file or line information are dropped. The leading frames belonging to the
/// `backtrace` crate or to this crate are trimmed, so index 0 is the first
/// frame outside the logger.
#[derive(Debug, Clone, Default)]
pub struct BacktraceSource {
    frames: Vec<Frame>,
}

impl BacktraceSource {
    #[inline(never)]
    pub fn capture() -> Self {
        let trace = backtrace::Backtrace::new();
        let mut frames = Vec::new();
        let mut in_prologue = true;

        for symbol in trace.frames().iter().flat_map(|frame| frame.symbols()) {
            if in_prologue {
                let internal = symbol
                    .name()
                    .map(|name| {
                        let name = format!("{:#}", name);
                        let name = name.trim_start_matches('<');
                        CAPTURE_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
                    })
                    .unwrap_or(true);
                if internal {
                    continue;
                }
                in_prologue = false;
            }

            if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                frames.push(Frame::new(file.to_string_lossy(), line));
            }
        }

        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for BacktraceSource {
    fn frame(&self, index: usize) -> Option<Frame> {
        self.frames.frame(index)
    }
}

/// Shorten a path to its last two segments
///
/// Backslashes are treated as separators. A separator at the very start of
/// the path is not counted, so `/a/b.rs` stays `/a/b.rs`.
///
/// ```
/// use entry_logger::core::callstack::shorten_file_name;
///
/// assert_eq!(shorten_file_name("/home/dev/app/src/main.rs"), "src/main.rs");
/// assert_eq!(shorten_file_name("main.rs"), "main.rs");
/// ```
pub fn shorten_file_name(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let bytes = normalized.as_bytes();
    let mut separators = 0;
    for i in (1..bytes.len()).rev() {
        if bytes[i] == b'/' {
            separators += 1;
            if separators == 2 {
                return normalized[i + 1..].to_string();
            }
        }
    }
    normalized
}

/// Rules for dropping infrastructure frames from a callstack
///
/// A frame is excluded when its short file name ends with an excluded
/// suffix, starts with an excluded prefix, or its full path (with `/`
/// separators) contains an excluded path marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFilter {
    excluded_suffixes: Vec<String>,
    excluded_prefixes: Vec<String>,
    excluded_paths: Vec<String>,
}

impl Default for FrameFilter {
    /// Assembly sources, the Rust toolchain's own library sources (runtime
    /// start-up, panics, test harness), the tokio scheduler and hyper's
    /// server internals.
    fn default() -> Self {
        Self::new()
            .exclude_suffix(".s")
            .exclude_suffix(".S")
            .exclude_suffix(".asm")
            .exclude_path("/rustc/")
            .exclude_path("/tokio-")
            .exclude_path("/hyper-")
    }
}

impl FrameFilter {
    /// A filter that keeps every frame
    pub fn new() -> Self {
        Self {
            excluded_suffixes: Vec::new(),
            excluded_prefixes: Vec::new(),
            excluded_paths: Vec::new(),
        }
    }

    #[must_use]
    pub fn exclude_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.excluded_suffixes.push(suffix.into());
        self
    }

    #[must_use]
    pub fn exclude_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_prefixes.push(prefix.into());
        self
    }

    #[must_use]
    pub fn exclude_path(mut self, marker: impl Into<String>) -> Self {
        self.excluded_paths.push(marker.into());
        self
    }

    /// Whether a frame should be left out of the callstack
    pub fn excludes(&self, full_path: &str, short_name: &str) -> bool {
        if self
            .excluded_suffixes
            .iter()
            .any(|suffix| short_name.ends_with(suffix.as_str()))
            || self
                .excluded_prefixes
                .iter()
                .any(|prefix| short_name.starts_with(prefix.as_str()))
        {
            return true;
        }

        if self.excluded_paths.is_empty() {
            return false;
        }
        let normalized = full_path.replace('\\', "/");
        self.excluded_paths
            .iter()
            .any(|marker| normalized.contains(marker.as_str()))
    }
}

/// Walk `source` from frame `skip` onward and render the surviving frames
///
/// Returns an empty string when no frame survives.
pub fn format_callstack<S>(source: &S, skip: usize, filter: &FrameFilter) -> String
where
    S: FrameSource + ?Sized,
{
    let mut frames = Vec::new();
    for i in 0.. {
        let Some(frame) = source.frame(skip + i) else {
            break;
        };
        let short = shorten_file_name(&frame.file);
        if filter.excludes(&frame.file, &short) {
            continue;
        }
        frames.push(format!("{}:{}", short, frame.line));
    }
    frames.join(", ")
}
