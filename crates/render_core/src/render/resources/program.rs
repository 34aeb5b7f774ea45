//! Shader program resource
//!
//! A linked program plus the uniform locations every 2D draw writes:
//!
//! | uniform           | type        | written per   |
//! |-------------------|-------------|---------------|
//! | `mvp`             | `mat3`      | object        |
//! | `layer`           | `float`     | object        |
//! | `texture_sampler` | `sampler2D` | program use   |

use crate::render::api::{BackendProgram, BackendResult, CompiledProgram, GraphicsBackend, UniformLocations};

/// Built-in vertex shader for textured 2D quads
///
/// The `layer` uniform becomes clip-space depth, so overlapping objects are
/// ordered by the depth test rather than by draw order.
pub const DEFAULT_VERTEX_SHADER: &str = r"#version 330 core

layout (location = 0) in vec2 vertices;
layout (location = 1) in vec2 uvs;

out vec2 tex_coord;

uniform float layer;
uniform mat3 mvp;

void main() {
    vec3 transformed = mvp * vec3(vertices, 1.0);
    gl_Position = vec4(transformed.xy, layer, transformed.z);
    tex_coord = uvs;
}
";

/// Built-in fragment shader sampling one texture
pub const DEFAULT_FRAGMENT_SHADER: &str = r"#version 330 core

in vec2 tex_coord;

out vec4 colour;

uniform sampler2D texture_sampler;

void main() {
    colour = texture(texture_sampler, tex_coord);
}
";

/// A linked shader program with cached uniform locations
#[derive(Debug)]
pub struct Program {
    compiled: CompiledProgram,
}

impl Program {
    /// Compile and link a program from source
    pub fn compile(backend: &mut dyn GraphicsBackend, vertex_src: &str, fragment_src: &str) -> BackendResult<Self> {
        let compiled = backend.compile_program(vertex_src, fragment_src)?;
        Ok(Self { compiled })
    }

    /// Compile the built-in textured 2D program
    pub fn compile_default(backend: &mut dyn GraphicsBackend) -> BackendResult<Self> {
        Self::compile(backend, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER)
    }

    /// Backend handle
    pub fn handle(&self) -> BackendProgram {
        self.compiled.handle
    }

    /// Cached uniform locations
    pub fn uniforms(&self) -> UniformLocations {
        self.compiled.uniforms
    }

    /// Make the program current
    pub fn activate(&self, backend: &mut dyn GraphicsBackend) {
        backend.use_program(&self.compiled);
    }

    /// Give the program back to the backend
    pub fn release(self, backend: &mut dyn GraphicsBackend) {
        backend.destroy_program(self.compiled.handle);
    }
}
