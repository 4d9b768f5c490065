//! The matcap mesh renderer.
//!
//! One pipeline draws everything: vertices carry object-space position
//! and normal, instances carry a model matrix, and the fragment shader
//! shades by sampling the matcap texture with the view-space normal.

use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::{DepthTexture, MatcapTexture};
use crate::scene::mesh::{InstanceRaw, MeshVertex, Transform};
use crate::scene::torus::decoration_torus;
use crate::scene::{Scene, SceneEntity};

/// One mesh plus its instances, ready to draw.
struct DrawBatch {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
}

/// Renders the scene with a single instanced matcap pipeline.
pub struct MatcapRenderer {
    pipeline: wgpu::RenderPipeline,
    matcap_layout: wgpu::BindGroupLayout,
    matcap: MatcapTexture,
    depth: DepthTexture,
    text: Option<DrawBatch>,
    tori: Option<DrawBatch>,
}

impl MatcapRenderer {
    /// Build the pipeline and the placeholder matcap.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let device = &context.device;
        let matcap_layout = MatcapTexture::bind_group_layout(device);
        let matcap = MatcapTexture::placeholder(
            device,
            &context.queue,
            &matcap_layout,
        );
        let depth =
            DepthTexture::new(device, context.config.width, context.config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Matcap Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/matcap.wgsl").into(),
            ),
        });

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Matcap Pipeline Layout"),
                bind_group_layouts: &[camera_layout, &matcap_layout],
                push_constant_ranges: &[],
            });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x3,
            ],
        };
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                2 => Float32x4,
                3 => Float32x4,
                4 => Float32x4,
                5 => Float32x4,
            ],
        };

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Matcap Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_layout, instance_layout],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    // Glyph outlines do not guarantee winding, so draw
                    // both faces
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTexture::FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Self {
            pipeline,
            matcap_layout,
            matcap,
            depth,
            text: None,
            tori: None,
        }
    }

    /// Recreate the depth buffer after a surface resize.
    pub fn resize(&mut self, context: &RenderContext) {
        self.depth = DepthTexture::new(
            &context.device,
            context.config.width,
            context.config.height,
        );
    }

    /// Swap in the real matcap image.
    pub fn set_matcap(
        &mut self,
        context: &RenderContext,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) {
        self.matcap = MatcapTexture::from_rgba(
            &context.device,
            &context.queue,
            &self.matcap_layout,
            pixels,
            width,
            height,
        );
    }

    /// Rebuild the draw batches from the scene entities.
    pub fn upload_scene(&mut self, context: &RenderContext, scene: &Scene) {
        let mut torus_instances: Vec<InstanceRaw> = Vec::new();
        for entity in scene.entities() {
            match entity {
                SceneEntity::Text { mesh, offset } => {
                    let instance =
                        InstanceRaw::from(&Transform::from_position(*offset));
                    self.text = make_batch(
                        context,
                        "Text",
                        &mesh.vertices,
                        &mesh.indices,
                        &[instance],
                    );
                }
                SceneEntity::Torus { transform } => {
                    torus_instances.push(InstanceRaw::from(transform));
                }
            }
        }

        if torus_instances.is_empty() {
            self.tori = None;
        } else {
            let mesh = decoration_torus();
            self.tori = make_batch(
                context,
                "Torus",
                &mesh.vertices,
                &mesh.indices,
                &torus_instances,
            );
        }
    }

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Propagates [`wgpu::SurfaceError`] from surface acquisition; the
    /// caller decides whether to reconfigure or bail.
    pub fn render(
        &self,
        context: &RenderContext,
        camera_bind_group: &wgpu::BindGroup,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = context.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            },
        );

        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Matcap Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, camera_bind_group, &[]);
            pass.set_bind_group(1, &self.matcap.bind_group, &[]);

            for batch in [self.text.as_ref(), self.tori.as_ref()]
                .into_iter()
                .flatten()
            {
                pass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, batch.instance_buffer.slice(..));
                pass.set_index_buffer(
                    batch.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(
                    0..batch.index_count,
                    0,
                    0..batch.instance_count,
                );
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Upload a mesh and its instances as immutable buffers.
fn make_batch(
    context: &RenderContext,
    label: &str,
    vertices: &[MeshVertex],
    indices: &[u32],
    instances: &[InstanceRaw],
) -> Option<DrawBatch> {
    if vertices.is_empty() || indices.is_empty() || instances.is_empty() {
        return None;
    }
    let device = &context.device;
    let vertex_buffer =
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
    let index_buffer =
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
    let instance_buffer =
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Instance Buffer")),
            contents: bytemuck::cast_slice(instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

    Some(DrawBatch {
        vertex_buffer,
        index_buffer,
        index_count: indices.len() as u32,
        instance_buffer,
        instance_count: instances.len() as u32,
    })
}
