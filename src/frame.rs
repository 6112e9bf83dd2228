//! Caller resolution and call-stack capture.
//!
//! Both operations sit behind the [`Introspect`] trait so the renderer can be
//! driven by a deterministic implementation in tests. The default,
//! [`BacktraceIntrospector`], walks the native stack with the [`backtrace`]
//! crate.
//!
//! A walk always starts by dropping the leading frames that belong to the
//! stack walker, to this crate's own pipeline, or to the runtime (drop glue,
//! call shims). `skip = 0` therefore names the code that called into the
//! logger, and each additional unit of `skip` walks one frame further out.

use std::fmt;
use std::path::{Component, Path};

/// Default ceiling on the number of frames a stack capture inspects.
pub const DEFAULT_MAX_FRAMES: usize = 10;

/// Function-name prefixes treated as runtime scaffolding rather than caller
/// code.
pub const DEFAULT_INTERNAL_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "__rust",
    "__libc",
    "_Unwind",
    "_start",
];

/// Module prefixes of this crate's own logging pipeline. Frames under these
/// are never reported as the caller.
const PIPELINE_PREFIXES: &[&str] = &[
    "tintlog::frame::",
    "tintlog::render::",
    "tintlog::logger::",
    "tintlog::session::",
    "tintlog::global::",
];

/// Placeholder for a location the debug info cannot resolve.
const UNKNOWN: &str = "???";

/// A resolved call-site location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Last path segment of the source file.
    pub file: String,
    /// Name of the immediate parent directory, without any `@version` suffix.
    pub directory: String,
    /// Version split off a `name@version` directory segment.
    pub version: Option<String>,
    pub function: String,
    pub line: u32,
}

impl Frame {
    /// Build a frame from a full source path, keeping only the file name and
    /// the immediate parent directory name.
    pub fn from_path(path: &Path, function: impl Into<String>, line: u32) -> Self {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (directory, version) = match parent.split_once('@') {
            Some((dir, version)) => (dir.to_string(), Some(version.to_string())),
            None => (parent, None),
        };

        Self {
            file,
            directory,
            version,
            function: function.into(),
            line,
        }
    }

    /// A frame whose source location is unavailable.
    pub fn unknown(function: impl Into<String>) -> Self {
        Self {
            file: UNKNOWN.to_string(),
            directory: UNKNOWN.to_string(),
            version: None,
            function: function.into(),
            line: 0,
        }
    }

    /// The `directory/file:line` form used by the `%file%` token.
    pub fn location(&self) -> String {
        format!("{}/{}:{}", self.directory, self.file, self.line)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}/{}:{}) {}",
            self.directory, self.file, self.line, self.function
        )
    }
}

/// Predicate deciding which frames are runtime scaffolding.
///
/// A frame is internal when its function path starts with one of the
/// configured prefixes. For a qualified symbol `<Self as Trait>::method` the
/// self type is checked once reference, pointer, `dyn` and `fn(..) ->` sigils
/// are removed. When the self type is not a named path (a bare `fn()` pointer
/// or a tuple) the trait path decides instead, so a closure shim such as
/// `<fn() as core::ops::function::FnOnce<()>>::call_once` is internal while
/// `<app::Rows as core::iter::Iterator>::next` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFilter {
    prefixes: Vec<String>,
}

impl FrameFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_internal(&self, function: &str) -> bool {
        match split_qualified(function) {
            Some((self_ty, trait_path)) => {
                let self_ty = strip_sigils(self_ty);
                if self.matches(self_ty) {
                    return true;
                }
                !is_named_path(self_ty) && self.matches(trait_path)
            }
            None => self.matches(function.trim_start_matches('<')),
        }
    }

    fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

impl Default for FrameFilter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERNAL_PREFIXES.iter().copied())
    }
}

/// Split `<Self as Trait>::method` into its self type and trait path. An
/// inherent `<Self>::method` yields an empty trait path.
fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let inner = name.strip_prefix('<')?;
    let bytes = inner.as_bytes();
    let mut depth = 0usize;
    let mut as_at = None;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => depth += 1,
            // The arrow of a `fn(..) -> T` type.
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' if depth == 0 => {
                return Some(match as_at {
                    Some(at) => (&inner[..at], &inner[at + AS.len()..i]),
                    None => (&inner[..i], ""),
                });
            }
            b'>' => depth -= 1,
            b' ' if depth == 0 && as_at.is_none() && inner[i..].starts_with(AS) => {
                as_at = Some(i);
            }
            _ => {}
        }
    }
    None
}

const AS: &str = " as ";

/// Remove the sigils wrapping a type so its path is exposed.
fn strip_sigils(mut ty: &str) -> &str {
    const SIGILS: &[&str] = &["&", "mut ", "*const ", "*mut ", "dyn ", "impl ", "unsafe "];
    loop {
        let mut next = ty.trim_start();
        for sigil in SIGILS {
            next = next.strip_prefix(*sigil).unwrap_or(next);
        }
        if next.starts_with("fn(")
            && let Some((_, ret)) = next.split_once(" -> ")
        {
            next = ret;
        }
        if next == ty {
            return ty;
        }
        ty = next;
    }
}

fn is_named_path(ty: &str) -> bool {
    !ty.starts_with("fn(")
        && ty
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
}

/// Stack introspection capability used by the renderer.
pub trait Introspect: Send {
    /// Resolve the caller `skip` frames out from the logging call site.
    fn resolve_caller(&self, skip: usize) -> Option<Frame>;

    /// Capture the caller chain starting `skip` frames out, innermost first,
    /// with internal frames removed.
    fn capture_stack(&self, skip: usize) -> Vec<Frame>;
}

/// Where a walked frame comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// The stack walker or this crate's logging pipeline.
    Pipeline,
    /// Language runtime, standard library or unresolvable scaffolding.
    Runtime,
    Caller,
}

#[derive(Debug, Clone)]
struct Walked {
    origin: Origin,
    frame: Frame,
}

/// The walk from the first caller-side frame outwards.
fn past_pipeline(frames: &[Walked]) -> &[Walked] {
    let start = frames
        .iter()
        .position(|walked| walked.origin == Origin::Caller)
        .unwrap_or(frames.len());
    &frames[start..]
}

/// The frame `skip` steps out from the first caller-side frame. A runtime
/// frame at that depth means the walk crossed a trampoline, so the frame one
/// step in is reported instead.
fn select_caller(frames: &[Walked], skip: usize) -> Option<Frame> {
    let frames = past_pipeline(frames);
    let target = frames.get(skip)?;
    if skip > 0 && target.origin == Origin::Runtime {
        return Some(frames[skip - 1].frame.clone());
    }
    Some(target.frame.clone())
}

/// At most `max_frames` frames starting `skip` steps out, runtime frames
/// removed after the window is taken.
fn select_stack(frames: &[Walked], skip: usize, max_frames: usize) -> Vec<Frame> {
    past_pipeline(frames)
        .iter()
        .take(skip + max_frames)
        .skip(skip)
        .filter(|walked| walked.origin != Origin::Runtime)
        .map(|walked| walked.frame.clone())
        .collect()
}

/// Source directory of this crate's library modules.
const CRATE_SOURCES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src");

/// Library modules that make up the logging pipeline.
const PIPELINE_FILES: &[&str] = &["frame.rs", "render.rs", "logger.rs", "session.rs", "global.rs"];

/// Whether `path` is a source file of the pipeline or of the stack walker.
///
/// Symbol names carry no module path when only line tables are available,
/// so the source path is the reliable signal there.
fn is_pipeline_source(path: &Path) -> bool {
    let in_crate = path.parent() == Some(Path::new(CRATE_SOURCES))
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| PIPELINE_FILES.contains(&name));
    in_crate || path.components().any(|c| has_prefix(c, "backtrace-0."))
}

/// Whether `path` belongs to the toolchain's own sources.
fn is_runtime_source(path: &Path) -> bool {
    path.starts_with("/rustc") || path.components().any(|c| c.as_os_str() == "rustlib")
}

fn has_prefix(component: Component<'_>, prefix: &str) -> bool {
    component
        .as_os_str()
        .to_str()
        .is_some_and(|name| name.starts_with(prefix))
}

/// [`Introspect`] implementation backed by the [`backtrace`] crate.
#[derive(Debug, Clone)]
pub struct BacktraceIntrospector {
    filter: FrameFilter,
    max_frames: usize,
}

impl BacktraceIntrospector {
    pub fn new(filter: FrameFilter, max_frames: usize) -> Self {
        Self { filter, max_frames }
    }

    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    fn is_pipeline(name: &str) -> bool {
        let name = name.trim_start_matches('<');
        PIPELINE_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
    }

    fn classify(&self, name: Option<&str>, path: Option<&Path>) -> Origin {
        if name.is_some_and(Self::is_pipeline) || path.is_some_and(is_pipeline_source) {
            return Origin::Pipeline;
        }
        if path.is_some_and(is_runtime_source) {
            return Origin::Runtime;
        }
        match name {
            Some(name) if self.filter.is_internal(name) => Origin::Runtime,
            Some(_) => Origin::Caller,
            None if path.is_some() => Origin::Caller,
            None => Origin::Runtime,
        }
    }

    /// Walk the native stack until `wanted` frames past the leading
    /// pipeline and runtime frames have been seen.
    fn walk(&self, wanted: usize) -> Vec<Walked> {
        let mut frames = Vec::new();
        let mut outward = 0usize;

        backtrace::trace(|raw| {
            backtrace::resolve_frame(raw, |symbol| {
                if outward >= wanted {
                    return;
                }
                let name = symbol.name().map(|name| format!("{name:#}"));
                let path = symbol.filename();
                let origin = self.classify(name.as_deref(), path);
                if outward > 0 || origin == Origin::Caller {
                    outward += 1;
                }

                let function = name.unwrap_or_else(|| UNKNOWN.to_string());
                let frame = match path {
                    Some(path) => Frame::from_path(path, function, symbol.lineno().unwrap_or(0)),
                    None => Frame::unknown(function),
                };
                frames.push(Walked { origin, frame });
            });
            outward < wanted
        });

        frames
    }
}

impl Default for BacktraceIntrospector {
    fn default() -> Self {
        Self::new(FrameFilter::default(), DEFAULT_MAX_FRAMES)
    }
}

impl Introspect for BacktraceIntrospector {
    fn resolve_caller(&self, skip: usize) -> Option<Frame> {
        select_caller(&self.walk(skip + 1), skip)
    }

    fn capture_stack(&self, skip: usize) -> Vec<Frame> {
        select_stack(&self.walk(skip + self.max_frames), skip, self.max_frames)
    }
}

/// Deterministic [`Introspect`] for unit tests: always reports the same
/// caller and stack, and counts how often it was asked.
#[cfg(test)]
pub(crate) mod fixed {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{Frame, Introspect};

    #[derive(Debug, Clone)]
    pub(crate) struct FixedIntrospector {
        pub caller: Frame,
        pub stack: Vec<Frame>,
        pub resolves: Arc<AtomicUsize>,
        pub captures: Arc<AtomicUsize>,
    }

    impl FixedIntrospector {
        pub(crate) fn new(caller: Frame, stack: Vec<Frame>) -> Self {
            Self {
                caller,
                stack,
                resolves: Arc::new(AtomicUsize::new(0)),
                captures: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub(crate) fn resolve_count(&self) -> usize {
            self.resolves.load(Ordering::SeqCst)
        }

        pub(crate) fn capture_count(&self) -> usize {
            self.captures.load(Ordering::SeqCst)
        }
    }

    impl Introspect for FixedIntrospector {
        fn resolve_caller(&self, _skip: usize) -> Option<Frame> {
            self.resolves.fetch_add(1, Ordering::SeqCst);
            Some(self.caller.clone())
        }

        fn capture_stack(&self, skip: usize) -> Vec<Frame> {
            self.captures.fetch_add(1, Ordering::SeqCst);
            self.stack.iter().skip(skip).cloned().collect()
        }
    }
}
