//=========================================================================
// Triangle Demo
//=========================================================================
//
// Opens a window and traverses a camera + shader + triangle scene, with
// horizontal mouse movement turning the camera.
//
// Drawing goes to the recording renderer; set RUST_LOG=debug to watch the
// traversals, or RUST_LOG=rsg::printer=info for the bound mouse values.
//
//   cargo run --example triangle            (retained: redraw on input)
//   cargo run --example triangle -- 60      (immediate: 60 traversals/s)
//
//=========================================================================

use reactive_scene_graph::core::node::adapters::scale;
use reactive_scene_graph::platform::headless::RecordingRenderer;
use reactive_scene_graph::prelude::*;

const VERTEX_SHADER: &str = r#"#version 330
layout(location = 0) in vec3 a_position;
uniform mat4 u_view;
uniform mat4 u_projection;
void main()
{
    gl_Position = u_projection * u_view * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330
out vec4 frag_color;
void main()
{
    frag_color = vec4(0.5, 0.0, 0.0, 1.0);
}
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frequency = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<f64>()?,
        None => 0.0,
    };

    let (renderer, _log) = RecordingRenderer::new();
    let config = SurfaceConfig::new(1024, 768).with_title("triangle");
    let mut global = GlobalContext::init(config, Box::new(renderer))?;

    let (width, height) = global.screen_size();
    let mouse = NodeRef::new(MouseManipulatorNode::new(&global));
    let camera = NodeRef::new(CameraNode::perspective_default(width as f32 / height.max(1) as f32));
    let printer = NodeRef::new(PropertyPrinterNode::new());
    let shader = NodeRef::new(ShaderNode::from_sources(&mut global, VERTEX_SHADER, FRAGMENT_SHADER)?);
    let mesh = NodeRef::new(MeshNode::triangle(&mut global)?);

    mouse.connect_property_with_adapters("xChange", &camera, "yawChange", vec![scale(0.01)]);
    mouse.connect_property("x", &printer, "int1");
    mouse.connect_property("y", &printer, "int2");

    let root = NodeRef::new(GroupNode::new());
    for child in [mouse, camera, printer, shader, mesh] {
        root.add_child(child);
    }

    let frames = main_loop(&root, frequency, &mut global)?;
    root.destroy(&mut global);

    println!("{} traversals", frames);
    Ok(())
}
