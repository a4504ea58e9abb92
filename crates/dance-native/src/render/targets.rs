use super::helpers;

pub const SCENE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Fixed-size off-screen target the scene is drawn into before the fill
/// composite. It keeps its size when the window is resized.
pub(crate) struct RenderTargets {
    pub(crate) width: u32,
    pub(crate) height: u32,
    #[allow(dead_code)]
    pub(crate) scene_tex: wgpu::Texture,
    pub(crate) scene_view: wgpu::TextureView,
    #[allow(dead_code)]
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let (scene_tex, scene_view) = helpers::create_color_texture(
            device,
            "scene_tex",
            width,
            height,
            SCENE_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let (depth_tex, depth_view) = helpers::create_color_texture(
            device,
            "depth_tex",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        Self {
            width,
            height,
            scene_tex,
            scene_view,
            depth_tex,
            depth_view,
        }
    }

    pub(crate) fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}
