//! Request bodies for every Apiframe endpoint.
//!
//! Each struct carries its documented defaults from `new`, optional fields are
//! set with `with_*` builders, and unset optionals are left out of the JSON
//! body entirely. The endpoint path lives next to the body via [`TaskRequest`].
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{AppError, AppResult};
use crate::task::validate::{self, Validate};

pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// A JSON body bound to the endpoint path it is posted to.
pub trait TaskRequest: Serialize + Validate {
    const PATH: &'static str;
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> AppResult<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(AppError::validation(
                        $field,
                        format!("'{}' is not one of: {}", other, [$($wire),+].join(", ")),
                    )),
                }
            }
        }
    };
}

string_enum!(
    /// Generation speed tier.
    #[derive(Default)]
    ProcessMode, "process_mode" { #[default] Fast => "fast", Turbo => "turbo" }
);

string_enum!(UpscaleAltType, "type" { Subtle => "subtle", Creative => "creative" });

string_enum!(UpscaleHighresType, "type" { X2 => "2x", X4 => "4x" });

string_enum!(PanDirection, "direction" { Up => "up", Down => "down", Left => "left", Right => "right" });

string_enum!(
    /// Output shape for `blend`.
    #[derive(Default)]
    BlendDimension, "dimension" { #[default] Square => "square", Portrait => "portrait", Landscape => "landscape" }
);

/// Which image of a grid to vary, or a strength for an upscaled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationIndex {
    Image(u8),
    Strong,
    Subtle,
}

impl Serialize for VariationIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VariationIndex::Image(i) => serializer.collect_str(i),
            VariationIndex::Strong => serializer.serialize_str("strong"),
            VariationIndex::Subtle => serializer.serialize_str("subtle"),
        }
    }
}

impl FromStr for VariationIndex {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" => Ok(VariationIndex::Strong),
            "subtle" => Ok(VariationIndex::Subtle),
            other => other
                .parse::<u8>()
                .map(VariationIndex::Image)
                .map_err(|_| AppError::validation("index", format!("'{}' is not 1-4, strong or subtle", other))),
        }
    }
}

fn index_as_string<S: Serializer>(index: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(index)
}

/// `webhook_url` / `webhook_secret`, flattened into every body that accepts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Webhook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

impl Webhook {
    fn validate(&self) -> AppResult<()> {
        validate::optional_url("webhook_url", self.webhook_url.as_deref())
    }
}

macro_rules! webhook_builders {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// The remote service posts the final task result to this URL.
                pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
                    self.webhook.webhook_url = Some(url.into());
                    self
                }

                /// Sent back as the `x-webhook-secret` header of the webhook call.
                pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
                    self.webhook.webhook_secret = Some(secret.into());
                    self
                }

                pub fn with_webhook(mut self, webhook: Webhook) -> Self {
                    self.webhook = webhook;
                    self
                }
            }
        )+
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagineRequest {
    pub prompt: String,
    pub aspect_ratio: String,
    pub process_mode: ProcessMode,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl ImagineRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        ImagineRequest {
            prompt: prompt.into(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            process_mode: ProcessMode::default(),
            webhook: Webhook::default(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    pub fn with_process_mode(mut self, mode: ProcessMode) -> Self {
        self.process_mode = mode;
        self
    }
}

impl Validate for ImagineRequest {
    fn validate(&self) -> AppResult<()> {
        validate::prompt("prompt", &self.prompt)?;
        validate::aspect_ratio(&self.aspect_ratio)?;
        self.webhook.validate()
    }
}

impl TaskRequest for ImagineRequest {
    const PATH: &'static str = "imagine";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Upscale1xRequest {
    pub parent_task_id: String,
    #[serde(serialize_with = "index_as_string")]
    pub index: u8,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl Upscale1xRequest {
    pub fn new(parent_task_id: impl Into<String>, index: u8) -> Self {
        Upscale1xRequest { parent_task_id: parent_task_id.into(), index, webhook: Webhook::default() }
    }
}

impl Validate for Upscale1xRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("parent_task_id", &self.parent_task_id)?;
        validate::range_u8("index", self.index, 1, 4)?;
        self.webhook.validate()
    }
}

impl TaskRequest for Upscale1xRequest {
    const PATH: &'static str = "upscale-1x";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpscaleAltRequest {
    pub parent_task_id: String,
    #[serde(rename = "type")]
    pub kind: UpscaleAltType,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl UpscaleAltRequest {
    pub fn new(parent_task_id: impl Into<String>, kind: UpscaleAltType) -> Self {
        UpscaleAltRequest { parent_task_id: parent_task_id.into(), kind, webhook: Webhook::default() }
    }
}

impl Validate for UpscaleAltRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("parent_task_id", &self.parent_task_id)?;
        self.webhook.validate()
    }
}

impl TaskRequest for UpscaleAltRequest {
    const PATH: &'static str = "upscale-alt";
}

/// Non-Midjourney upscale; the parent image must not exceed 2048x2048.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpscaleHighresRequest {
    pub parent_task_id: String,
    #[serde(rename = "type")]
    pub kind: UpscaleHighresType,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl UpscaleHighresRequest {
    pub fn new(parent_task_id: impl Into<String>, kind: UpscaleHighresType) -> Self {
        UpscaleHighresRequest { parent_task_id: parent_task_id.into(), kind, webhook: Webhook::default() }
    }
}

impl Validate for UpscaleHighresRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("parent_task_id", &self.parent_task_id)?;
        self.webhook.validate()
    }
}

impl TaskRequest for UpscaleHighresRequest {
    const PATH: &'static str = "upscale-highres";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerollRequest {
    pub parent_task_id: String,
    /// Defaults server-side to the parent task's prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub aspect_ratio: String,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl RerollRequest {
    pub fn new(parent_task_id: impl Into<String>) -> Self {
        RerollRequest {
            parent_task_id: parent_task_id.into(),
            prompt: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            webhook: Webhook::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }
}

impl Validate for RerollRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("parent_task_id", &self.parent_task_id)?;
        validate::optional_prompt("prompt", self.prompt.as_deref())?;
        validate::aspect_ratio(&self.aspect_ratio)?;
        self.webhook.validate()
    }
}

impl TaskRequest for RerollRequest {
    const PATH: &'static str = "reroll";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariationsRequest {
    pub parent_task_id: String,
    pub index: VariationIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub aspect_ratio: String,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl VariationsRequest {
    pub fn new(parent_task_id: impl Into<String>, index: VariationIndex) -> Self {
        VariationsRequest {
            parent_task_id: parent_task_id.into(),
            index,
            prompt: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            webhook: Webhook::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }
}

impl Validate for VariationsRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("parent_task_id", &self.parent_task_id)?;
        if let VariationIndex::Image(i) = self.index {
            validate::range_u8("index", i, 1, 4)?;
        }
        validate::optional_prompt("prompt", self.prompt.as_deref())?;
        validate::aspect_ratio(&self.aspect_ratio)?;
        self.webhook.validate()
    }
}

impl TaskRequest for VariationsRequest {
    const PATH: &'static str = "variations";
}

/// Vary Region: redraw the masked area of an upscaled image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InpaintRequest {
    pub parent_task_id: String,
    pub mask: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl InpaintRequest {
    /// `mask` is the base64 encoding of the selected area.
    pub fn new(parent_task_id: impl Into<String>, mask: impl Into<String>) -> Self {
        InpaintRequest {
            parent_task_id: parent_task_id.into(),
            mask: mask.into(),
            prompt: None,
            webhook: Webhook::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

impl Validate for InpaintRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("parent_task_id", &self.parent_task_id)?;
        validate::base64_image("mask", &self.mask)?;
        validate::optional_prompt("prompt", self.prompt.as_deref())?;
        self.webhook.validate()
    }
}

impl TaskRequest for InpaintRequest {
    const PATH: &'static str = "inpaint";
}

/// Zoom Out: enlarge the canvas while keeping the original content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutpaintRequest {
    pub parent_task_id: String,
    pub zoom_ratio: f64,
    pub aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl OutpaintRequest {
    pub fn new(parent_task_id: impl Into<String>, zoom_ratio: f64) -> Self {
        OutpaintRequest {
            parent_task_id: parent_task_id.into(),
            zoom_ratio,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            prompt: None,
            webhook: Webhook::default(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

impl Validate for OutpaintRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("parent_task_id", &self.parent_task_id)?;
        validate::range_f64("zoom_ratio", self.zoom_ratio, 1.0, 2.0)?;
        validate::aspect_ratio(&self.aspect_ratio)?;
        validate::optional_prompt("prompt", self.prompt.as_deref())?;
        self.webhook.validate()
    }
}

impl TaskRequest for OutpaintRequest {
    const PATH: &'static str = "outpaint";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanRequest {
    pub parent_task_id: String,
    pub direction: PanDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl PanRequest {
    pub fn new(parent_task_id: impl Into<String>, direction: PanDirection) -> Self {
        PanRequest {
            parent_task_id: parent_task_id.into(),
            direction,
            prompt: None,
            webhook: Webhook::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

impl Validate for PanRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("parent_task_id", &self.parent_task_id)?;
        validate::optional_prompt("prompt", self.prompt.as_deref())?;
        self.webhook.validate()
    }
}

impl TaskRequest for PanRequest {
    const PATH: &'static str = "pan";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribeRequest {
    pub image_url: String,
    pub process_mode: ProcessMode,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl DescribeRequest {
    pub fn new(image_url: impl Into<String>) -> Self {
        DescribeRequest {
            image_url: image_url.into(),
            process_mode: ProcessMode::default(),
            webhook: Webhook::default(),
        }
    }

    pub fn with_process_mode(mut self, mode: ProcessMode) -> Self {
        self.process_mode = mode;
        self
    }
}

impl Validate for DescribeRequest {
    fn validate(&self) -> AppResult<()> {
        validate::absolute_url("image_url", &self.image_url)?;
        self.webhook.validate()
    }
}

impl TaskRequest for DescribeRequest {
    const PATH: &'static str = "describe";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendRequest {
    pub image_urls: Vec<String>,
    pub dimension: BlendDimension,
    pub process_mode: ProcessMode,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl BlendRequest {
    pub fn new<I, S>(image_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BlendRequest {
            image_urls: image_urls.into_iter().map(Into::into).collect(),
            dimension: BlendDimension::default(),
            process_mode: ProcessMode::default(),
            webhook: Webhook::default(),
        }
    }

    pub fn with_dimension(mut self, dimension: BlendDimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_process_mode(mut self, mode: ProcessMode) -> Self {
        self.process_mode = mode;
        self
    }
}

impl Validate for BlendRequest {
    fn validate(&self) -> AppResult<()> {
        validate::count("image_urls", &self.image_urls, 2, 5)?;
        for url in &self.image_urls {
            validate::absolute_url("image_urls", url)?;
        }
        self.webhook.validate()
    }
}

impl TaskRequest for BlendRequest {
    const PATH: &'static str = "blend";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedRequest {
    pub task_id: String,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl SeedRequest {
    pub fn new(task_id: impl Into<String>) -> Self {
        SeedRequest { task_id: task_id.into(), webhook: Webhook::default() }
    }
}

impl Validate for SeedRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("task_id", &self.task_id)?;
        self.webhook.validate()
    }
}

impl TaskRequest for SeedRequest {
    const PATH: &'static str = "seed";
}

/// Each image must contain exactly one face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceswapRequest {
    pub target_image_url: String,
    pub swap_image_url: String,
    #[serde(flatten)]
    pub webhook: Webhook,
}

impl FaceswapRequest {
    pub fn new(target_image_url: impl Into<String>, swap_image_url: impl Into<String>) -> Self {
        FaceswapRequest {
            target_image_url: target_image_url.into(),
            swap_image_url: swap_image_url.into(),
            webhook: Webhook::default(),
        }
    }
}

impl Validate for FaceswapRequest {
    fn validate(&self) -> AppResult<()> {
        validate::absolute_url("target_image_url", &self.target_image_url)?;
        validate::absolute_url("swap_image_url", &self.swap_image_url)?;
        self.webhook.validate()
    }
}

impl TaskRequest for FaceswapRequest {
    const PATH: &'static str = "faceswap";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchRequest {
    pub task_id: String,
}

impl FetchRequest {
    pub fn new(task_id: impl Into<String>) -> Self {
        FetchRequest { task_id: task_id.into() }
    }
}

impl Validate for FetchRequest {
    fn validate(&self) -> AppResult<()> {
        validate::non_empty("task_id", &self.task_id)
    }
}

impl TaskRequest for FetchRequest {
    const PATH: &'static str = "fetch";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchManyRequest {
    pub task_ids: Vec<String>,
}

impl FetchManyRequest {
    pub fn new<I, S>(task_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FetchManyRequest { task_ids: task_ids.into_iter().map(Into::into).collect() }
    }
}

impl Validate for FetchManyRequest {
    fn validate(&self) -> AppResult<()> {
        validate::count("task_ids", &self.task_ids, 2, 20)?;
        for id in &self.task_ids {
            validate::non_empty("task_ids", id)?;
        }
        Ok(())
    }
}

impl TaskRequest for FetchManyRequest {
    const PATH: &'static str = "fetch-many";
}

webhook_builders!(
    ImagineRequest,
    Upscale1xRequest,
    UpscaleAltRequest,
    UpscaleHighresRequest,
    RerollRequest,
    VariationsRequest,
    InpaintRequest,
    OutpaintRequest,
    PanRequest,
    DescribeRequest,
    BlendRequest,
    SeedRequest,
    FaceswapRequest,
);
