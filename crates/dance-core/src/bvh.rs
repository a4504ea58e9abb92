//! Biovision hierarchy (.bvh) parsing.
//!
//! The parser is token based, so braces and keywords may share a line or sit
//! on lines of their own. End Sites are kept as channel-less joints so that
//! trackers can follow finger, toe and head tips too.

use std::path::Path;

use glam::Vec3;

use crate::{Result, SketchError};

/// One animated degree of freedom of a joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Xposition,
    Yposition,
    Zposition,
    Xrotation,
    Yrotation,
    Zrotation,
}

impl Channel {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "xposition" => Some(Self::Xposition),
            "yposition" => Some(Self::Yposition),
            "zposition" => Some(Self::Zposition),
            "xrotation" => Some(Self::Xrotation),
            "yrotation" => Some(Self::Yrotation),
            "zrotation" => Some(Self::Zrotation),
            _ => None,
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(self, Self::Xrotation | Self::Yrotation | Self::Zrotation)
    }
}

#[derive(Clone, Debug)]
pub struct BvhJoint {
    pub name: String,
    pub parent: Option<usize>,
    pub offset: Vec3,
    pub channels: Vec<Channel>,
    /// Index of this joint's first value inside a motion frame.
    pub channel_start: usize,
    pub is_end_site: bool,
}

/// A parsed clip: the joint hierarchy plus one row of channel values per frame.
///
/// Joints are stored in file order, so a parent always precedes its children.
#[derive(Clone, Debug)]
pub struct Bvh {
    pub joints: Vec<BvhJoint>,
    pub frame_time: f32,
    pub channel_count: usize,
    values: Vec<f32>,
}

impl Bvh {
    pub fn num_frames(&self) -> usize {
        if self.channel_count == 0 {
            0
        } else {
            self.values.len() / self.channel_count
        }
    }

    /// Channel values of one frame, in file order.
    pub fn frame(&self, index: usize) -> &[f32] {
        let start = index * self.channel_count;
        &self.values[start..start + self.channel_count]
    }
}

pub fn load_bvh(path: impl AsRef<Path>) -> Result<Bvh> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| SketchError::io(path, e))?;
    let bvh = parse_bvh(&source)?;
    log::info!(
        "loaded {}: {} joints, {} frames at {:.4}s",
        path.display(),
        bvh.joints.len(),
        bvh.num_frames(),
        bvh.frame_time
    );
    Ok(bvh)
}

pub fn parse_bvh(source: &str) -> Result<Bvh> {
    let mut tokens = Tokens::new(source);
    let mut joints = Vec::new();
    let mut channel_count = 0usize;

    tokens.expect("HIERARCHY")?;
    tokens.expect("ROOT")?;
    parse_joint(&mut tokens, None, &mut joints, &mut channel_count)?;

    tokens.expect("MOTION")?;
    tokens.expect("Frames:")?;
    let declared_frames: usize = tokens.parse_next("frame count")?;
    tokens.expect("Frame")?;
    tokens.expect("Time:")?;
    let frame_time: f32 = tokens.parse_next("frame time")?;
    if !(frame_time > 0.0) {
        return Err(SketchError::BvhStructure(format!(
            "frame time must be positive, got {frame_time}"
        )));
    }

    // Sized from the rows actually present, the declared count is only checked.
    let mut values = Vec::new();
    while let Some((line, token)) = tokens.next() {
        let value = token
            .parse::<f32>()
            .map_err(|_| SketchError::syntax(line, format!("expected a number, got `{token}`")))?;
        values.push(value);
    }

    if channel_count == 0 {
        return Err(SketchError::BvhStructure("hierarchy declares no channels".into()));
    }
    if values.len() % channel_count != 0 {
        return Err(SketchError::BvhStructure(format!(
            "{} motion values do not split into frames of {channel_count} channels",
            values.len()
        )));
    }
    let available = values.len() / channel_count;
    if available != declared_frames {
        log::warn!("bvh declares {declared_frames} frames but holds {available}");
    }
    if available == 0 {
        return Err(SketchError::BvhStructure("clip has no motion frames".into()));
    }

    Ok(Bvh {
        joints,
        frame_time,
        channel_count,
        values,
    })
}

fn parse_joint(
    tokens: &mut Tokens<'_>,
    parent: Option<usize>,
    joints: &mut Vec<BvhJoint>,
    channel_count: &mut usize,
) -> Result<()> {
    let (line, name) = tokens.require("joint name")?;
    if name == "{" {
        return Err(SketchError::syntax(line, "joint is missing a name"));
    }
    let index = joints.len();
    joints.push(BvhJoint {
        name: name.to_string(),
        parent,
        offset: Vec3::ZERO,
        channels: Vec::new(),
        channel_start: *channel_count,
        is_end_site: false,
    });
    tokens.expect("{")?;

    loop {
        let (line, token) = tokens.require("joint body")?;
        match token {
            "OFFSET" => joints[index].offset = tokens.parse_vec3()?,
            "CHANNELS" => {
                let count: usize = tokens.parse_next("channel count")?;
                let mut channels = Vec::with_capacity(count.min(6));
                for _ in 0..count {
                    let (line, name) = tokens.require("channel name")?;
                    let channel = Channel::parse(name).ok_or_else(|| {
                        SketchError::syntax(line, format!("unknown channel `{name}`"))
                    })?;
                    channels.push(channel);
                }
                joints[index].channel_start = *channel_count;
                *channel_count += channels.len();
                joints[index].channels = channels;
            }
            "JOINT" => parse_joint(tokens, Some(index), joints, channel_count)?,
            "End" => {
                tokens.expect("Site")?;
                tokens.expect("{")?;
                tokens.expect("OFFSET")?;
                let offset = tokens.parse_vec3()?;
                tokens.expect("}")?;
                joints.push(BvhJoint {
                    name: format!("{}_end", joints[index].name),
                    parent: Some(index),
                    offset,
                    channels: Vec::new(),
                    channel_start: *channel_count,
                    is_end_site: true,
                });
            }
            "}" => return Ok(()),
            other => {
                return Err(SketchError::syntax(
                    line,
                    format!("unexpected `{other}` inside joint `{}`", joints[index].name),
                ))
            }
        }
    }
}

struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(source: &'a str) -> Self {
        let inner = source
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |t| (i + 1, t)));
        Self {
            inner: Box::new(inner),
            last_line: 0,
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let next = self.inner.next();
        if let Some((line, _)) = next {
            self.last_line = line;
        }
        next
    }

    fn require(&mut self, what: &str) -> Result<(usize, &'a str)> {
        self.next().ok_or_else(|| {
            SketchError::syntax(self.last_line, format!("unexpected end of file, expected {what}"))
        })
    }

    fn expect(&mut self, keyword: &str) -> Result<()> {
        let (line, token) = self.require(keyword)?;
        if token.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(SketchError::syntax(
                line,
                format!("expected `{keyword}`, got `{token}`"),
            ))
        }
    }

    fn parse_next<T: std::str::FromStr>(&mut self, what: &str) -> Result<T> {
        let (line, token) = self.require(what)?;
        token
            .parse()
            .map_err(|_| SketchError::syntax(line, format!("invalid {what} `{token}`")))
    }

    fn parse_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(
            self.parse_next("offset x")?,
            self.parse_next("offset y")?,
            self.parse_next("offset z")?,
        ))
    }
}
