//! This module provides RegionMap, the channel to region table sent to a processor,
//!   along with its text encoding.
//!
//! The encoding is a stream tag followed by one `<channel>,<region>;` entry per channel,
//!   e.g. `ProbeA-AP 0,947;1,947;...;383,947;`.

use thiserror::Error;

/// Region identifiers, one per block of consecutive channels
pub const REGION_IDS: [u32; 8] = [947, 322, 895, 631, 178, 128, 125, 947];
/// Number of consecutive channels sharing one region identifier
pub const EXPANSION_FACTOR: usize = 48;
/// Tag naming the stream the map applies to (the trailing space separates it from the entries)
pub const STREAM_TAG: &str = "ProbeA-AP ";

/// RegionMap expands a short list of region identifiers into one entry per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMap {
    /// Region identifier of each block, duplicates allowed
    region_ids: Vec<u32>,
    /// Number of channels per block
    expansion: usize,
}

/// Reasons a config text could not be read back as a region map
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// Text does not begin with the expected stream tag
    #[error("message does not start with tag {0:?}")]
    MissingTag(String),
    /// Last entry is not followed by ';'
    #[error("message is not terminated by ';'")]
    Unterminated,
    /// Entry is not of the form `<digits>,<digits>`
    #[error("malformed entry {0:?}")]
    MalformedEntry(String),
}

impl RegionMap {
    /// Associated function for creating a map of `expansion` channels per region identifier
    pub fn new(region_ids: Vec<u32>, expansion: usize) -> Self {
        Self {
            region_ids,
            expansion,
        }
    }
    /// Total number of channels (entries) in the map
    pub fn len(&self) -> usize {
        self.region_ids.len() * self.expansion
    }
    /// Whether the map has no entries at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Region identifier assigned to given channel, `None` past the end of the map
    pub fn region_for(&self, channel: usize) -> Option<u32> {
        if self.expansion == 0 {
            return None;
        }
        self.region_ids.get(channel / self.expansion).copied()
    }
    /// Iterator over `(channel, region)` pairs in increasing channel order
    pub fn entries(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        let expansion = self.expansion;
        self.region_ids
            .iter()
            .enumerate()
            .flat_map(move |(block, &region)| {
                (0..expansion).map(move |offset| (block * expansion + offset, region))
            })
    }
    /// Encodes the map as config text, prefixed with given stream tag
    pub fn to_message(&self, tag: &str) -> String {
        let entries: String = self
            .entries()
            .map(|(channel, region)| format!("{channel},{region};"))
            .collect();
        format!("{tag}{entries}")
    }
}

impl Default for RegionMap {
    fn default() -> Self {
        Self::new(REGION_IDS.to_vec(), EXPANSION_FACTOR)
    }
}

/// Reads config text produced by [`RegionMap::to_message`] back into `(channel, region)` pairs.
/// Entries are returned in text order, no ordering or gap checks are made.
pub fn parse_message(tag: &str, text: &str) -> Result<Vec<(usize, u32)>, MessageError> {

    let entries = text
        .strip_prefix(tag)
        .ok_or_else(|| MessageError::MissingTag(tag.to_string()))?;
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    // Splitting on ';' leaves an empty final segment, drop it with the terminator
    let entries = entries.strip_suffix(';').ok_or(MessageError::Unterminated)?;
    entries.split(';').map(parse_entry).collect()
}

/// Parses a single `<channel>,<region>` entry (without its terminator)
fn parse_entry(entry: &str) -> Result<(usize, u32), MessageError> {
    let malformed = || MessageError::MalformedEntry(entry.to_string());

    let (channel, region) = entry.split_once(',').ok_or_else(malformed)?;
    if !is_digits(channel) || !is_digits(region) {
        return Err(malformed());
    }
    match (channel.parse(), region.parse()) {
        (Ok(channel), Ok(region)) => Ok((channel, region)),
        _ => Err(malformed()),
    }
}

/// Checks that the field is a non-empty run of ASCII digits (`parse` alone would accept a sign)
fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

// Hic sunt tests:
