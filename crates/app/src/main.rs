//! Entry point for meshview: logging + CLI, mesh load, then the viewer loop.
//!
//! The mesh is parsed to completion before any window or GPU state exists;
//! a failed load aborts startup with exit code 1.

use anyhow::{Context, Result, bail};

fn parse_backend_arg() -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = backend_from_flag(val);
        }
    }
    backends
}

fn backend_from_flag(val: &str) -> wgpu::Backends {
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn parse_size_args() -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(800).max(1);
    let hh = h.unwrap_or(600).max(1);
    (ww, hh)
}

/// The one required positional argument: the mesh file path.
fn parse_mesh_path() -> Result<String> {
    let positional: Vec<String> = std::env::args()
        .skip(1)
        .filter(|a| !a.starts_with("--"))
        .collect();
    match positional.as_slice() {
        [path] => Ok(path.clone()),
        _ => bail!(
            "Usage: meshview <path-to-obj> [--gpu-backend=auto|vulkan|dx12|metal|gl] [--size=WxH]"
        ),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let backends = parse_backend_arg();
    let (width, height) = parse_size_args();
    let mesh_path = parse_mesh_path()?;

    log::info!(
        "Starting meshview. Backend: {:?}, window_size={}x{}, mesh='{}'",
        backends,
        width,
        height,
        mesh_path
    );

    let mesh = asset::load_obj_from_path(&mesh_path)
        .with_context(|| format!("Failed to load mesh from '{mesh_path}'"))?;
    log::info!(
        "Loaded mesh: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );

    platform::run(mesh, backends, width, height)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_flag_values_map_to_backends() {
        assert_eq!(backend_from_flag("vulkan"), wgpu::Backends::VULKAN);
        assert_eq!(backend_from_flag("VK"), wgpu::Backends::VULKAN);
        assert_eq!(backend_from_flag("dx12"), wgpu::Backends::DX12);
        assert_eq!(backend_from_flag("metal"), wgpu::Backends::METAL);
        assert_eq!(backend_from_flag("gles"), wgpu::Backends::GL);
        assert_eq!(backend_from_flag("auto"), wgpu::Backends::all());
    }

    #[test]
    fn unknown_backend_falls_back_to_auto() {
        assert_eq!(backend_from_flag("quartz"), wgpu::Backends::all());
    }
}
