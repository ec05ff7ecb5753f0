use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks a surface format from `formats`, the adapter's list in preference
/// order.
///
/// With `prefer_srgb` the surface encodes on write, so shaders output linear
/// values. Without it, 8-bit channel values reach the screen unconverted,
/// which is what byte colors and image pixels expect.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let wanted: [wgpu::TextureFormat; 2] = if prefer_srgb {
        [wgpu::TextureFormat::Bgra8UnormSrgb, wgpu::TextureFormat::Rgba8UnormSrgb]
    } else {
        [wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Rgba8Unorm]
    };

    let found = wanted.into_iter().find(|f| formats.contains(f));
    if found.is_none() {
        if let Some(first) = formats.first() {
            log::debug!("no {} 8-bit surface format; using {first:?}", if prefer_srgb { "sRGB" } else { "linear" });
        }
    }
    found.or_else(|| formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Records a new drawable size. A minimized window reports 0×0; the surface
/// keeps its old configuration until a usable size arrives.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        log::debug!("surface minimized; configuration kept");
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
    log::debug!("surface resized to {}×{}", new_size.width, new_size.height);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = classify(&err);
    match action {
        SurfaceErrorAction::Reconfigured => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            log::debug!("surface {err:?}; reconfigured");
        }
        SurfaceErrorAction::SkipFrame => log::debug!("surface {err:?}; frame skipped"),
        SurfaceErrorAction::Fatal => log::error!("surface error: {err}"),
    }
    action
}

fn classify(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn linear_format_preferred_when_srgb_off() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats, false), Some(TextureFormat::Bgra8Unorm));
        assert_eq!(choose_surface_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [TextureFormat::Rgba16Float];
        assert_eq!(choose_surface_format(&formats, false), Some(TextureFormat::Rgba16Float));
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_mode_is_replaced() {
        let modes = [CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }

    #[test]
    fn surface_errors_map_to_actions() {
        assert_eq!(classify(&wgpu::SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(classify(&wgpu::SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
