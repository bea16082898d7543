// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fixed-function state blocks: sampler, rasterizer, depth-stencil and blend.
//!
//! Every block implements `Default` with the Direct3D defaults.

use bitflags::bitflags;

/// Texture filtering mode of a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling everywhere.
    MinMagMipPoint,
    /// Point min/mag, linear between mips.
    MinMagPointMipLinear,
    /// Point min, linear mag, point mip.
    MinPointMagLinearMipPoint,
    /// Point min, linear mag and mip.
    MinPointMagMipLinear,
    /// Linear min, point mag and mip.
    MinLinearMagMipPoint,
    /// Linear min, point mag, linear mip.
    MinLinearMagPointMipLinear,
    /// Linear min/mag, point mip.
    MinMagLinearMipPoint,
    /// Trilinear filtering.
    #[default]
    MinMagMipLinear,
    /// Anisotropic filtering.
    Anisotropic,
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureAddressMode {
    /// Tile the texture.
    Wrap,
    /// Tile the texture, mirroring at every integer boundary.
    Mirror,
    /// Clamp to the edge texel.
    #[default]
    Clamp,
    /// Use the sampler's border color.
    Border,
    /// Mirror once around zero, then clamp.
    MirrorOnce,
}

/// A comparison function, used for depth, stencil and comparison samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComparisonFunc {
    /// Never passes.
    #[default]
    Never,
    /// Passes if the source is less than the destination.
    Less,
    /// Passes if both are equal.
    Equal,
    /// Passes if the source is less than or equal to the destination.
    LessEqual,
    /// Passes if the source is greater than the destination.
    Greater,
    /// Passes if both differ.
    NotEqual,
    /// Passes if the source is greater than or equal to the destination.
    GreaterEqual,
    /// Always passes.
    Always,
}

/// A sampler state description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerState {
    /// Filtering mode.
    pub filter: FilterMode,
    /// Address mode along U.
    pub address_u: TextureAddressMode,
    /// Address mode along V.
    pub address_v: TextureAddressMode,
    /// Address mode along W.
    pub address_w: TextureAddressMode,
    /// Offset added to the computed mip level.
    pub mip_lod_bias: f32,
    /// Clamp for anisotropic filtering, `1..=16`.
    pub max_anisotropy: u32,
    /// Comparison function of comparison samplers.
    pub comparison_func: ComparisonFunc,
    /// Border color used with [`TextureAddressMode::Border`].
    pub border_color: [f32; 4],
    /// Lowest accessible mip level.
    pub min_lod: f32,
    /// Highest accessible mip level.
    pub max_lod: f32,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            filter: FilterMode::MinMagMipLinear,
            address_u: TextureAddressMode::Clamp,
            address_v: TextureAddressMode::Clamp,
            address_w: TextureAddressMode::Clamp,
            mip_lod_bias: 0.0,
            max_anisotropy: 16,
            comparison_func: ComparisonFunc::Never,
            border_color: [0.0; 4],
            min_lod: -f32::MAX,
            max_lod: f32::MAX,
        }
    }
}

/// Polygon fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Draw edges only.
    Wireframe,
    /// Fill triangles.
    #[default]
    Solid,
}

/// Which triangle faces are culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// Draw all faces.
    None,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    #[default]
    Back,
}

/// Rasterizer state block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizerState {
    /// Polygon fill mode.
    pub fill_mode: FillMode,
    /// Face culling.
    pub cull_mode: CullMode,
    /// If `true`, counter-clockwise triangles are front facing.
    pub front_counter_clockwise: bool,
    /// Constant depth bias.
    pub depth_bias: i32,
    /// Maximum depth bias.
    pub depth_bias_clamp: f32,
    /// Depth bias scaled by the slope of the primitive.
    pub slope_scaled_depth_bias: f32,
    /// Clip against the near and far planes.
    pub depth_clip_enable: bool,
    /// Multisample anti-aliasing.
    pub multisample_enable: bool,
    /// Line anti-aliasing.
    pub antialiased_line_enable: bool,
    /// Forced UAV-only rasterization sample count, 0 to disable.
    pub forced_sample_count: u32,
    /// Conservative rasterization.
    pub conservative_rasterization: bool,
    /// Scissor test.
    pub scissor_enable: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::Back,
            front_counter_clockwise: false,
            depth_bias: 0,
            depth_bias_clamp: 0.0,
            slope_scaled_depth_bias: 0.0,
            depth_clip_enable: true,
            multisample_enable: false,
            antialiased_line_enable: false,
            forced_sample_count: 0,
            conservative_rasterization: false,
            scissor_enable: false,
        }
    }
}

/// Whether depth writes are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthWriteMask {
    /// Depth writes disabled.
    Zero,
    /// Depth writes enabled.
    #[default]
    All,
}

/// Stencil operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOp {
    /// Keep the existing value.
    #[default]
    Keep,
    /// Set to zero.
    Zero,
    /// Replace with the reference value.
    Replace,
    /// Increment and clamp.
    IncrSat,
    /// Decrement and clamp.
    DecrSat,
    /// Invert the bits.
    Invert,
    /// Increment and wrap.
    Incr,
    /// Decrement and wrap.
    Decr,
}

/// Stencil operations of one triangle face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilOpDescription {
    /// Operation when the stencil test fails.
    pub stencil_fail_op: StencilOp,
    /// Operation when the stencil test passes and the depth test fails.
    pub stencil_depth_fail_op: StencilOp,
    /// Operation when both tests pass.
    pub stencil_pass_op: StencilOp,
    /// The stencil test.
    pub stencil_func: ComparisonFunc,
}

impl Default for DepthStencilOpDescription {
    fn default() -> Self {
        Self {
            stencil_fail_op: StencilOp::Keep,
            stencil_depth_fail_op: StencilOp::Keep,
            stencil_pass_op: StencilOp::Keep,
            stencil_func: ComparisonFunc::Always,
        }
    }
}

/// Depth-stencil state block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilState {
    /// Depth test.
    pub depth_enable: bool,
    /// Depth writes.
    pub depth_write_mask: DepthWriteMask,
    /// Depth comparison.
    pub depth_func: ComparisonFunc,
    /// Stencil test.
    pub stencil_enable: bool,
    /// Stencil read mask.
    pub stencil_read_mask: u8,
    /// Stencil write mask.
    pub stencil_write_mask: u8,
    /// Stencil operations of front faces.
    pub front_face: DepthStencilOpDescription,
    /// Stencil operations of back faces.
    pub back_face: DepthStencilOpDescription,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_enable: true,
            depth_write_mask: DepthWriteMask::All,
            depth_func: ComparisonFunc::Less,
            stencil_enable: false,
            stencil_read_mask: 0xff,
            stencil_write_mask: 0xff,
            front_face: DepthStencilOpDescription::default(),
            back_face: DepthStencilOpDescription::default(),
        }
    }
}

/// Blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blend {
    /// `0`
    Zero,
    /// `1`
    One,
    /// Source color.
    SrcColor,
    /// `1 - source color`
    InvSrcColor,
    /// Source alpha.
    SrcAlpha,
    /// `1 - source alpha`
    InvSrcAlpha,
    /// Destination alpha.
    DestAlpha,
    /// `1 - destination alpha`
    InvDestAlpha,
    /// Destination color.
    DestColor,
    /// `1 - destination color`
    InvDestColor,
    /// Saturated source alpha.
    SrcAlphaSat,
    /// Constant blend factor.
    BlendFactor,
    /// `1 - constant blend factor`
    InvBlendFactor,
}

/// How the weighted source and destination are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    /// `src + dst`
    Add,
    /// `src - dst`
    Subtract,
    /// `dst - src`
    RevSubtract,
    /// `min(src, dst)`
    Min,
    /// `max(src, dst)`
    Max,
}

bitflags! {
    /// Color channels written to a render target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWriteMask: u8 {
        /// Red channel.
        const RED = 1 << 0;
        /// Green channel.
        const GREEN = 1 << 1;
        /// Blue channel.
        const BLUE = 1 << 2;
        /// Alpha channel.
        const ALPHA = 1 << 3;
        /// All channels.
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

/// Blending of one render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetBlendDescription {
    /// Enables blending.
    pub blend_enable: bool,
    /// Source color factor.
    pub src_blend: Blend,
    /// Destination color factor.
    pub dest_blend: Blend,
    /// Color operation.
    pub blend_op: BlendOp,
    /// Source alpha factor.
    pub src_blend_alpha: Blend,
    /// Destination alpha factor.
    pub dest_blend_alpha: Blend,
    /// Alpha operation.
    pub blend_op_alpha: BlendOp,
    /// Written channels.
    pub render_target_write_mask: ColorWriteMask,
}

impl Default for RenderTargetBlendDescription {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_blend: Blend::One,
            dest_blend: Blend::Zero,
            blend_op: BlendOp::Add,
            src_blend_alpha: Blend::One,
            dest_blend_alpha: Blend::Zero,
            blend_op_alpha: BlendOp::Add,
            render_target_write_mask: ColorWriteMask::ALL,
        }
    }
}

/// Blend state block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlendState {
    /// Alpha-to-coverage multisampling.
    pub alpha_to_coverage_enable: bool,
    /// When `false`, only `render_target[0]` is used for every target.
    pub independent_blend_enable: bool,
    /// Per render target blending.
    pub render_target: [RenderTargetBlendDescription; 8],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_blend_state_writes_all_channels_without_blending() {
        let state = BlendState::default();
        assert!(state
            .render_target
            .iter()
            .all(|target| !target.blend_enable
                && target.render_target_write_mask == ColorWriteMask::ALL));
    }

    #[test]
    fn default_sampler_is_trilinear_and_clamped() {
        let sampler = SamplerState::default();
        assert_eq!(sampler.filter, FilterMode::MinMagMipLinear);
        assert_eq!(sampler.address_u, TextureAddressMode::Clamp);
        assert_eq!(sampler.max_lod, f32::MAX);
    }
}
