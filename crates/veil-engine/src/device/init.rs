use crate::scene::MAX_TEXTURE_DIMENSION;

/// How the slideshow window asks for its GPU.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an `*UnormSrgb` swapchain so photos are shown as authored.
    pub prefer_srgb: bool,
    /// Vsync by default; the frame loop is paced by presentation.
    pub present_mode: wgpu::PresentMode,
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub power_preference: wgpu::PowerPreference,
    pub required_features: wgpu::Features,
    /// Largest image side the device is asked to hold. Clamped to what the
    /// adapter offers; decoded images are sized to fit it.
    pub max_texture_dimension: u32,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            max_texture_dimension: MAX_TEXTURE_DIMENSION,
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Device limits to request from an adapter offering `adapter`.
    ///
    /// The swapchain is a 2D texture too, so the side never drops below
    /// `surface_side`.
    pub fn device_limits(&self, adapter: &wgpu::Limits, surface_side: u32) -> wgpu::Limits {
        let side = self
            .max_texture_dimension
            .max(surface_side)
            .clamp(1, adapter.max_texture_dimension_2d.max(1));
        wgpu::Limits {
            max_texture_dimension_2d: side,
            ..wgpu::Limits::downlevel_defaults()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_side_is_capped_by_the_adapter() {
        let init = GpuInit::default();
        let small = wgpu::Limits { max_texture_dimension_2d: 4096, ..wgpu::Limits::default() };
        assert_eq!(init.device_limits(&small, 1920).max_texture_dimension_2d, 4096);

        let large = wgpu::Limits { max_texture_dimension_2d: 16384, ..wgpu::Limits::default() };
        assert_eq!(init.device_limits(&large, 1920).max_texture_dimension_2d, MAX_TEXTURE_DIMENSION);
    }

    #[test]
    fn texture_side_covers_the_surface() {
        let init = GpuInit { max_texture_dimension: 1024, ..GpuInit::default() };
        let adapter = wgpu::Limits { max_texture_dimension_2d: 16384, ..wgpu::Limits::default() };
        assert_eq!(init.device_limits(&adapter, 2560).max_texture_dimension_2d, 2560);
        assert_eq!(init.device_limits(&adapter, 800).max_texture_dimension_2d, 1024);
    }

    #[test]
    fn default_requests_the_decoder_limit() {
        assert_eq!(GpuInit::default().max_texture_dimension, MAX_TEXTURE_DIMENSION);
    }
}
