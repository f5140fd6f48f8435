//! Output file naming.
//!
//! `reads.fq.gz` + `R1` becomes `reads.R1.fq.gz`; `reads` with no tag becomes
//! `reads.fastq`. Extension matching is case-insensitive and the original
//! spelling is kept when re-appended.

use std::fmt;
use std::ffi::OsString;
use std::path::PathBuf;

const GZ_EXTENSION: &str = "gz";
const FASTQ_EXTENSIONS: &[&str] = &["fastq", "fq"];
const DEFAULT_EXTENSION: &str = ".fastq";

/// Which mate an output file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MateTag {
    R1,
    R2,
}

impl MateTag {
    pub fn as_str(self) -> &'static str {
        match self {
            MateTag::R1 => "R1",
            MateTag::R2 => "R2",
        }
    }
}

impl fmt::Display for MateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base output name plus optional mate tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDescriptor {
    pub base: PathBuf,
    pub mate: Option<MateTag>,
}

impl OutputDescriptor {
    pub fn new(base: impl Into<PathBuf>, mate: Option<MateTag>) -> Self {
        Self {
            base: base.into(),
            mate,
        }
    }

    /// Concrete output path.
    ///
    /// Works on the path's `OsStr` components, so a base that is not valid
    /// UTF-8 keeps its exact bytes.
    pub fn resolve(&self) -> PathBuf {
        let mut stem = self.base.clone();
        let gz = take_extension(&mut stem, &[GZ_EXTENSION]);
        let ext = take_extension(&mut stem, FASTQ_EXTENSIONS);

        let mut name = stem.into_os_string();
        if let Some(tag) = self.mate {
            name.push(".");
            name.push(tag.as_str());
        }
        match ext {
            Some(ext) => {
                name.push(".");
                name.push(ext);
            }
            None => name.push(DEFAULT_EXTENSION),
        }
        if let Some(gz) = gz {
            name.push(".");
            name.push(gz);
        }
        PathBuf::from(name)
    }
}

/// Remove the extension of `path` if it is one of `extensions` (ASCII case
/// ignored). Returns it as spelled in the path.
fn take_extension(path: &mut PathBuf, extensions: &[&str]) -> Option<OsString> {
    let ext = path.extension()?.to_str()?;
    if !extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
        return None;
    }
    let ext = OsString::from(ext);
    path.set_extension("");
    Some(ext)
}
