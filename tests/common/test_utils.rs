#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis::{
    AttribLocation, ClearFlags, Device, DrawError, Matrix4, Node, Primitive, RenderContext,
    ShaderProgram, TargetSurface, TextureBinding, UniformScope, UniformValue, VertexBuffer,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared log of device calls, cloneable so a test keeps a handle after the
/// context takes ownership of the device.
#[derive(Clone, Default)]
pub struct DeviceLog {
    viewports: Rc<RefCell<Vec<(u32, u32, u32, u32)>>>,
    clears: Rc<RefCell<Vec<ClearFlags>>>,
}

impl DeviceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(&self) -> Box<dyn Device> {
        Box::new(RecordingDevice { log: self.clone() })
    }

    pub fn viewports(&self) -> Vec<(u32, u32, u32, u32)> {
        self.viewports.borrow().clone()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.borrow().len()
    }
}

struct RecordingDevice {
    log: DeviceLog,
}

impl Device for RecordingDevice {
    fn viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.log.viewports.borrow_mut().push((x, y, width, height));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.log.clears.borrow_mut().push(flags);
    }
}

/// Shader stub that records activations and snapshots every uniform scope
/// pushed to it, resolved to flat name/value pairs.
pub struct MockShader {
    pub activations: Cell<u32>,
    pub applied: RefCell<Vec<Vec<(String, UniformValue)>>>,
    required: Vec<String>,
    has_position: bool,
}

impl MockShader {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            activations: Cell::new(0),
            applied: RefCell::new(Vec::new()),
            required: Vec::new(),
            has_position: true,
        })
    }

    /// A shader that reads the given uniform names and fails when one is
    /// missing from scope.
    pub fn requiring(names: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            activations: Cell::new(0),
            applied: RefCell::new(Vec::new()),
            required: names.iter().map(|name| name.to_string()).collect(),
            has_position: true,
        })
    }

    pub fn without_position() -> Rc<Self> {
        Rc::new(Self {
            activations: Cell::new(0),
            applied: RefCell::new(Vec::new()),
            required: Vec::new(),
            has_position: false,
        })
    }

    /// Number of draws this shader served.
    pub fn draw_count(&self) -> usize {
        self.applied.borrow().len()
    }

    /// The value of `name` as seen by draw number `index`.
    pub fn value_at(&self, index: usize, name: &str) -> Option<UniformValue> {
        self.applied.borrow()[index]
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value.clone())
    }

    /// Like [`value_at`](MockShader::value_at) but unwraps a mat4, panicking
    /// on anything else.
    pub fn mat4_at(&self, index: usize, name: &str) -> Matrix4<f32> {
        match self.value_at(index, name) {
            Some(UniformValue::Mat4(matrix)) => matrix,
            other => panic!("expected mat4 `{}` in draw {}, got {:?}", name, index, other),
        }
    }
}

impl ShaderProgram for MockShader {
    fn activate(&self) {
        self.activations.set(self.activations.get() + 1);
    }

    fn attrib_location(&self, name: &str) -> Option<AttribLocation> {
        (self.has_position && name == "position").then_some(AttribLocation(0))
    }

    fn apply_uniforms(&self, scope: &UniformScope) -> Result<(), DrawError> {
        for name in &self.required {
            if scope.get(name).is_none() {
                return Err(DrawError::MissingUniform(name.clone()));
            }
        }
        let snapshot = scope
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        self.applied.borrow_mut().push(snapshot);
        Ok(())
    }
}

/// Vertex-buffer stub tracking bind/draw/unbind calls.
pub struct MockBuffer {
    vertex_count: u32,
    pub binds: Cell<u32>,
    pub unbinds: Cell<u32>,
    pub draws: RefCell<Vec<Primitive>>,
    pub attribs: RefCell<Vec<AttribLocation>>,
}

impl MockBuffer {
    pub fn with_vertices(vertex_count: u32) -> Rc<Self> {
        Rc::new(Self {
            vertex_count,
            binds: Cell::new(0),
            unbinds: Cell::new(0),
            draws: RefCell::new(Vec::new()),
            attribs: RefCell::new(Vec::new()),
        })
    }
}

impl VertexBuffer for MockBuffer {
    fn bind(&self) {
        self.binds.set(self.binds.get() + 1);
    }

    fn attrib_pointer(&self, location: AttribLocation) {
        self.attribs.borrow_mut().push(location);
    }

    fn draw(&self, topology: Primitive) {
        self.draws.borrow_mut().push(topology);
    }

    fn unbind(&self) {
        self.unbinds.set(self.unbinds.get() + 1);
    }

    fn len(&self) -> u32 {
        self.vertex_count
    }
}

/// Texture stub recording the units it was bound to, plus bind/unbind
/// ordering in a log shared across textures.
pub struct MockTexture {
    name: &'static str,
    events: Rc<RefCell<Vec<String>>>,
    pub units: RefCell<Vec<u32>>,
}

impl MockTexture {
    pub fn new(name: &'static str, events: Rc<RefCell<Vec<String>>>) -> Rc<Self> {
        Rc::new(Self {
            name,
            events,
            units: RefCell::new(Vec::new()),
        })
    }
}

impl TextureBinding for MockTexture {
    fn bind(&self, unit: u32) {
        self.units.borrow_mut().push(unit);
        self.events
            .borrow_mut()
            .push(format!("bind {} {}", self.name, unit));
    }

    fn unbind(&self) {
        self.events.borrow_mut().push(format!("unbind {}", self.name));
    }
}

/// Offscreen-surface stub with a fixed size.
pub struct MockTarget {
    width: u32,
    height: u32,
    pub binds: Cell<u32>,
    pub unbinds: Cell<u32>,
}

impl MockTarget {
    pub fn with_size(width: u32, height: u32) -> Rc<Self> {
        Rc::new(Self {
            width,
            height,
            binds: Cell::new(0),
            unbinds: Cell::new(0),
        })
    }
}

impl TargetSurface for MockTarget {
    fn bind(&self) {
        self.binds.set(self.binds.get() + 1);
    }

    fn unbind(&self) {
        self.unbinds.set(self.unbinds.get() + 1);
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Node recording its enter/exit order into a shared log.
pub struct Probe {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
    children: Vec<Box<dyn Node>>,
}

impl Probe {
    pub fn new(
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        children: Vec<Box<dyn Node>>,
    ) -> Self {
        Self {
            name,
            log,
            children,
        }
    }
}

impl Node for Probe {
    fn enter(&self, _ctx: &mut RenderContext) -> Result<(), DrawError> {
        self.log.borrow_mut().push(format!("enter {}", self.name));
        Ok(())
    }

    fn exit(&self, _ctx: &mut RenderContext) {
        self.log.borrow_mut().push(format!("exit {}", self.name));
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}

/// Node whose enter always aborts the frame.
pub struct FailingNode;

impl Node for FailingNode {
    fn enter(&self, _ctx: &mut RenderContext) -> Result<(), DrawError> {
        Err(DrawError::Resource("failing node".into()))
    }
}

pub fn shared_log() -> Rc<RefCell<Vec<String>>> {
    Rc::new(RefCell::new(Vec::new()))
}
