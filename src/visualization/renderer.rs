use crate::geometry::Point2D;
use crate::spiral::{BoundingExtent, ScreenMapping, Viewport};
use anyhow::Result;
use glam::{Mat4, Vec4};
use std::sync::Arc;
use wgpu::util::DeviceExt;

const SHADERS_WGSL: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> mvp: mat4x4<f32>;

@vertex
fn vs_main(model: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = mvp * vec4<f32>(model.position, 0.0, 1.0);
    return out;
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.95, 0.75, 0.2, 1.0); // Opaque golden line
}
"#;

/// Pipeline state, built once per wgpu device.
pub struct SpiralPipeline {
    mvp_uniform_buffer: wgpu::Buffer,
    mvp_bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
}

/// Vertex data for one spiral, rebuilt whenever the points change.
pub struct SpiralGeometry {
    vertex_buffer: wgpu::Buffer,
    num_vertices: u32,
}

#[derive(Default)]
pub struct WgpuSpiralRenderer {
    pipeline: Option<Arc<SpiralPipeline>>,
    geometry: Option<Arc<SpiralGeometry>>,
    uploaded_points: Vec<Point2D>,
}

impl WgpuSpiralRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> Result<()> {
        if self.pipeline.is_some() {
            return Ok(());
        }

        tracing::info!("Preparing WgpuSpiralRenderer resources...");

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Spiral Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADERS_WGSL.into()),
        });

        let mvp_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spiral MVP Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Mat4::IDENTITY]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let mvp_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Spiral MVP Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let mvp_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Spiral MVP Bind Group"),
            layout: &mvp_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mvp_uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Spiral Render Pipeline Layout"),
            bind_group_layouts: &[&mvp_bind_group_layout],
            push_constant_ranges: &[],
        });
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Spiral Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Point2D>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        self.pipeline = Some(Arc::new(SpiralPipeline {
            mvp_uniform_buffer,
            mvp_bind_group,
            render_pipeline,
        }));

        tracing::info!("WgpuSpiralRenderer resources prepared successfully.");

        Ok(())
    }

    /// Uploads `points` as the line strip, unless they are already on the GPU.
    pub fn upload_points(&mut self, device: &wgpu::Device, points: &[Point2D]) {
        if points.len() < 2 {
            self.geometry = None;
            self.uploaded_points.clear();
            return;
        }
        if self.geometry.is_some() && self.uploaded_points == points {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spiral Vertex Buffer"),
            contents: bytemuck::cast_slice(points),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.geometry = Some(Arc::new(SpiralGeometry {
            vertex_buffer,
            num_vertices: points.len() as u32,
        }));
        self.uploaded_points = points.to_vec();
        tracing::debug!("Uploaded {} spiral vertices", points.len());
    }

    pub fn get_pipeline_arc(&self) -> Option<Arc<SpiralPipeline>> {
        self.pipeline.clone()
    }

    pub fn get_geometry_arc(&self) -> Option<Arc<SpiralGeometry>> {
        self.geometry.clone()
    }

    pub fn paint_primitive<'rp_lifetime>(
        pipeline: &'rp_lifetime SpiralPipeline,
        geometry: &'rp_lifetime SpiralGeometry,
        mvp_matrix: &Mat4,
        rpass: &mut wgpu::RenderPass<'rp_lifetime>,
        queue: &wgpu::Queue,
    ) {
        queue.write_buffer(
            &pipeline.mvp_uniform_buffer,
            0,
            bytemuck::cast_slice(&[*mvp_matrix]),
        );

        rpass.set_pipeline(&pipeline.render_pipeline);
        rpass.set_bind_group(0, &pipeline.mvp_bind_group, &[]);
        rpass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        rpass.draw(0..geometry.num_vertices, 0..1);
    }
}

/// World to clip space through the same [`ScreenMapping`] the rectangles
/// use, so the line strip passes through their corners.
pub fn calculate_mvp(extent: &BoundingExtent, viewport: Viewport) -> Mat4 {
    let mapping = ScreenMapping::new(extent, viewport);
    let (xscale, yscale) = mapping.scale();
    let origin = mapping.origin();
    let world_to_screen = Mat4::from_cols(
        Vec4::new(xscale, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -yscale, 0.0, 0.0),
        Vec4::Z,
        Vec4::new(-origin.x * xscale, origin.y * yscale, 0.0, 1.0),
    );
    // Screen y grows downwards
    let screen_to_clip = Mat4::orthographic_rh(
        0.0,
        viewport.width.max(1.0),
        viewport.height.max(1.0),
        0.0,
        -1.0,
        1.0,
    );
    screen_to_clip * world_to_screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spiral::{sequence, SpiralOutput};
    use glam::Vec2;

    fn clip_to_pixels(clip: Vec4, viewport: Viewport) -> Vec2 {
        Vec2::new(
            (clip.x + 1.0) * 0.5 * viewport.width,
            (1.0 - clip.y) * 0.5 * viewport.height,
        )
    }

    #[test]
    fn mvp_maps_extent_onto_clip_space_edges() {
        let extent = BoundingExtent {
            xmin: -10.0,
            xmax: 30.0,
            ymin: -5.0,
            ymax: 15.0,
        };
        let mvp = calculate_mvp(&extent, Viewport::new(800.0, 600.0));

        let lower_left = mvp * Vec4::new(-10.0, -5.0, 0.0, 1.0);
        let upper_right = mvp * Vec4::new(30.0, 15.0, 0.0, 1.0);
        let center = mvp * Vec4::new(10.0, 5.0, 0.0, 1.0);

        assert!((lower_left.x + 1.0).abs() < 1e-5 && (lower_left.y + 1.0).abs() < 1e-5);
        assert!((upper_right.x - 1.0).abs() < 1e-5 && (upper_right.y - 1.0).abs() < 1e-5);
        assert!(center.x.abs() < 1e-5 && center.y.abs() < 1e-5);
    }

    #[test]
    fn line_strip_and_rects_share_pixels() {
        let viewport = Viewport::new(980.0, 720.0);
        let output = SpiralOutput::from_samples(&sequence::generate(12), 1);
        let extent = output.extent.unwrap();
        let mapping = ScreenMapping::new(&extent, viewport);
        let mvp = calculate_mvp(&extent, viewport);

        for point in &output.points {
            let gpu = clip_to_pixels(mvp * Vec4::new(point.x, point.y, 0.0, 1.0), viewport);
            let rect = mapping.map_point(*point);
            assert!(
                (gpu.x - rect.x).abs() < 1e-2 && (gpu.y - rect.y).abs() < 1e-2,
                "vertex {point:?}: line at {gpu:?}, rect corner at {rect:?}"
            );
        }
    }

    #[test]
    fn degenerate_extent_stays_finite() {
        let extent = BoundingExtent {
            xmin: 1.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 0.0,
        };
        assert!(calculate_mvp(&extent, Viewport::new(100.0, 100.0)).is_finite());
        assert!(calculate_mvp(&extent, Viewport::new(0.0, 0.0)).is_finite());
    }
}
