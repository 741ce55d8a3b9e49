use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use lightbench_common::{Color, NodeId};
use lightbench_scene::{Light, Material, Node, Scene, SceneError};
use wgpu::util::DeviceExt;

use crate::shaders;

/// Lights beyond this count are ignored.
pub const MAX_LIGHTS: usize = 16;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    light_count: [u32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightData {
    color: [f32; 4],
    position: [f32; 4],
    direction: [f32; 4],
    extra: [f32; 4],
    axis: [f32; 4],
    kind: [u32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    color: [f32; 4],
    surface: [f32; 4],
}

// Must match the KIND_* constants in the mesh shader.
const KIND_AMBIENT: u32 = 0;
const KIND_DIRECTIONAL: u32 = 1;
const KIND_HEMISPHERE: u32 = 2;
const KIND_POINT: u32 = 3;
const KIND_SPOT: u32 = 4;
const KIND_RECT_AREA: u32 = 5;

fn scaled(color: Color, intensity: f32) -> [f32; 4] {
    let [r, g, b] = color.to_linear();
    [r * intensity, g * intensity, b * intensity, 1.0]
}

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

/// Pack one visible light for the shader.
fn light_data(scene: &Scene, node: &Node, light: &Light) -> LightData {
    let position = node.transform.position;
    let mut data = LightData {
        color: scaled(light.color(), light.intensity()),
        position: vec4(position, 0.0),
        direction: [0.0; 4],
        extra: [0.0; 4],
        axis: [0.0; 4],
        kind: [0; 4],
    };
    match light {
        Light::Ambient(_) => data.kind[0] = KIND_AMBIENT,
        Light::Hemisphere(l) => {
            data.kind[0] = KIND_HEMISPHERE;
            data.extra = scaled(l.ground_color, l.intensity);
        }
        Light::Directional(_) => {
            data.kind[0] = KIND_DIRECTIONAL;
            data.direction = vec4((Vec3::ZERO - position).normalize_or(Vec3::NEG_Y), 0.0);
        }
        Light::Point(l) => {
            data.kind[0] = KIND_POINT;
            data.position[3] = l.distance;
            data.direction[3] = l.decay;
        }
        Light::Spot(l) => {
            data.kind[0] = KIND_SPOT;
            let aim = scene
                .get(l.target)
                .map(|t| t.transform.position)
                .unwrap_or(Vec3::ZERO);
            data.position[3] = l.distance;
            data.direction = vec4((aim - position).normalize_or(Vec3::NEG_Y), l.decay);
            data.extra[0] = l.angle.cos();
            data.extra[1] = (l.angle * (1.0 - l.penumbra)).cos();
        }
        Light::RectArea(l) => {
            data.kind[0] = KIND_RECT_AREA;
            let rotation = node.transform.rotation.to_quat();
            data.direction = vec4(rotation * Vec3::NEG_Z, 0.0);
            data.extra = vec4(rotation * Vec3::X * (l.width * 0.5), 0.0);
            data.axis = vec4(rotation * Vec3::Y * (l.height * 0.5), 0.0);
        }
    }
    data
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Color + depth attachments the scene is drawn into before the blit.
struct SceneTarget {
    color: wgpu::TextureView,
    depth: wgpu::TextureView,
    blit_bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    blit_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    meshes: BTreeMap<NodeId, GpuMesh>,
    target: SceneTarget,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    /// `width` and `height` are the drawing-buffer size, which may differ
    /// from the window surface size.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lights_buffer"),
            contents: bytemuck::cast_slice(&[LightData::zeroed(); MAX_LIGHTS]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_entry = |binding: u32, visibility: wgpu::ShaderStages| {
            wgpu::BindGroupLayoutEntry {
                binding,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }
        };
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let mesh_pipeline = Self::create_mesh_pipeline(device, &globals_layout, surface_format);

        let blit_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blit_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let blit_pipeline = Self::create_blit_pipeline(device, &blit_layout, surface_format);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Instance buffer (pre-allocated)
        let max_instances = 256u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let target = Self::create_target(
            device,
            &blit_layout,
            &sampler,
            surface_format,
            width,
            height,
        );

        Self {
            mesh_pipeline,
            blit_pipeline,
            globals_buffer,
            lights_buffer,
            globals_bind_group,
            blit_layout,
            sampler,
            instance_buffer,
            max_instances,
            meshes: BTreeMap::new(),
            target,
            surface_format,
        }
    }

    /// Recreate the scene target at a new drawing-buffer size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (width, height) == (self.target.width, self.target.height) {
            return;
        }
        self.target = Self::create_target(
            device,
            &self.blit_layout,
            &self.sampler,
            self.surface_format,
            width,
            height,
        );
    }

    /// Upload geometry for mesh nodes seen for the first time.
    pub fn prepare(&mut self, device: &wgpu::Device, scene: &Scene) {
        for (id, node, mesh) in scene.meshes() {
            if self.meshes.contains_key(&id) {
                continue;
            }
            let buffers = mesh.geometry.tessellate();
            let vertices: Vec<Vertex> = buffers
                .positions
                .iter()
                .zip(&buffers.normals)
                .map(|(&position, &normal)| Vertex { position, normal })
                .collect();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&buffers.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            tracing::debug!(
                "uploaded '{}': {} vertices, {} triangles",
                node.name,
                buffers.vertex_count(),
                buffers.triangle_count()
            );
            self.meshes.insert(
                id,
                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: buffers.indices.len() as u32,
                },
            );
        }
    }

    /// Render the scene through `camera` into `view`.
    ///
    /// Call [`prepare`](Self::prepare) first so new meshes have geometry.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        camera: NodeId,
    ) -> Result<(), SceneError> {
        let camera_node = scene.node(camera)?;
        let projection = scene.camera(camera)?.projection_matrix();
        let world = camera_node.world_matrix();
        let view_proj = projection * world.inverse();

        let lights: Vec<LightData> = scene
            .lights()
            .filter(|(_, node, _)| node.visible)
            .take(MAX_LIGHTS)
            .map(|(_, node, light)| light_data(scene, node, light))
            .collect();
        if !lights.is_empty() {
            queue.write_buffer(&self.lights_buffer, 0, bytemuck::cast_slice(&lights));
        }
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                view_proj: view_proj.to_cols_array_2d(),
                camera_position: vec4(camera_node.transform.position, 1.0),
                light_count: [lights.len() as u32, 0, 0, 0],
            }),
        );

        // Build instance data from visible meshes
        let mut draws: Vec<&GpuMesh> = Vec::new();
        let mut instances: Vec<InstanceData> = Vec::new();
        for (id, node, mesh) in scene.meshes() {
            if !node.visible || instances.len() >= self.max_instances as usize {
                continue;
            }
            let Some(gpu_mesh) = self.meshes.get(&id) else {
                continue;
            };
            let material = scene.material(mesh.material)?;
            instances.push(instance_data(node.world_matrix(), material));
            draws.push(gpu_mesh);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.target.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (i, gpu_mesh) in draws.iter().enumerate() {
                let i = i as u32;
                pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu_mesh.index_count, 0, i..i + 1);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &self.target.blit_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
        globals_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[globals_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                            8 => Float32x4,
                            9 => Float32x4,
                            10 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_blit_pipeline(
        device: &wgpu::Device,
        blit_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit_pipeline_layout"),
            bind_group_layouts: &[blit_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BLIT_SHADER.into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blit_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_blit"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_blit"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_target(
        device: &wgpu::Device,
        blit_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> SceneTarget {
        let width = width.max(1);
        let height = height.max(1);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let color = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("scene_color_texture"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            })
            .create_view(&Default::default());
        let depth = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("scene_depth_texture"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&Default::default());
        let blit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit_bind_group"),
            layout: blit_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&color),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        SceneTarget {
            color,
            depth,
            blit_bind_group,
            width,
            height,
        }
    }
}

fn instance_data(model: Mat4, material: &Material) -> InstanceData {
    let normal = Mat3::from_mat4(model).inverse().transpose();
    let col = |v: Vec3| vec4(v, 0.0);
    let [r, g, b] = material.color.to_linear();
    InstanceData {
        model: model.to_cols_array_2d(),
        normal: [col(normal.x_axis), col(normal.y_axis), col(normal.z_axis)],
        color: [r, g, b, 1.0],
        surface: [material.roughness, material.metalness, 0.0, 0.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightbench_scene::{NodeKind, compose};

    fn packed(light: NodeId) -> LightData {
        let d = compose(1.0);
        let node = d.scene.node(light).unwrap();
        let NodeKind::Light(l) = &node.kind else {
            panic!("light expected");
        };
        light_data(&d.scene, node, l)
    }

    #[test]
    fn gpu_structs_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<LightData>() % 16, 0);
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
        assert_eq!(std::mem::size_of::<InstanceData>(), 9 * 16);
    }

    #[test]
    fn spot_aims_at_target() {
        let d = compose(1.0);
        let data = packed(d.handles.spot);
        let expected = (Vec3::new(-0.75, 0.0, 0.0) - Vec3::new(0.0, 2.0, 3.0)).normalize();
        let dir = Vec3::new(data.direction[0], data.direction[1], data.direction[2]);
        assert_eq!(data.kind[0], KIND_SPOT);
        assert!(dir.abs_diff_eq(expected, 1e-5));
        assert_eq!(data.direction[3], 1.0);
        assert!(data.extra[0] < data.extra[1]);
    }

    #[test]
    fn directional_points_at_origin() {
        let d = compose(1.0);
        let data = packed(d.handles.directional);
        let dir = Vec3::new(data.direction[0], data.direction[1], data.direction[2]);
        let expected = -Vec3::new(1.0, 0.25, 0.0).normalize();
        assert!(dir.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn rect_area_axes_follow_size() {
        let d = compose(1.0);
        let data = packed(d.handles.rect_area);
        let half_w = Vec3::new(data.extra[0], data.extra[1], data.extra[2]);
        let half_h = Vec3::new(data.axis[0], data.axis[1], data.axis[2]);
        assert!((half_w.length() - 1.5).abs() < 1e-5);
        assert!((half_h.length() - 0.5).abs() < 1e-5);
        assert!(half_w.dot(half_h).abs() < 1e-5);
    }

    #[test]
    fn intensity_scales_color() {
        let d = compose(1.0);
        let data = packed(d.handles.point);
        // 0xff9000 red channel is 1.0 in both sRGB and linear
        assert!((data.color[0] - 1.5).abs() < 1e-4);
        assert_eq!(data.position[3], 10.0);
    }

    #[test]
    fn instance_carries_material() {
        let material = Material {
            roughness: 0.4,
            metalness: 0.2,
            ..Material::default()
        };
        let inst = instance_data(Mat4::IDENTITY, &material);
        assert_eq!(inst.surface, [0.4, 0.2, 0.0, 0.0]);
        assert_eq!(inst.normal[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
