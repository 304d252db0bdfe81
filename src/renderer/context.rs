use crate::value::{Object, Value};

/// Per-iteration loop metadata, surfaced to templates as `loop`.
pub(crate) struct LoopFrame {
    pub index: usize,
    pub len: usize,
}

impl LoopFrame {
    fn is_first(&self) -> bool {
        self.index == 0
    }

    fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }
}

/// Layered name resolution over a borrowed root object. Lookups resolve the
/// full dotted path within each scope from the innermost outwards, then the
/// loop frames (head segment `loop`), then the root data. The per-path
/// fallback means a scope that binds `brother` but not `brother.daughters`
/// does not shadow the root's `brother.daughters`.
pub(crate) struct ContextStack<'d> {
    root: &'d Value,
    scopes: Vec<Object>,
    frames: Vec<LoopFrame>,
}

impl<'d> ContextStack<'d> {
    pub fn new(root: &'d Value) -> Self {
        ContextStack {
            root,
            scopes: vec![Object::new()],
            frames: Vec::new(),
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Object::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn push_frame(&mut self, len: usize) {
        self.frames.push(LoopFrame { index: 0, len });
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub fn set_frame_index(&mut self, index: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.index = index;
        }
    }

    /// Binds a name in the innermost scope, shadowing outer bindings.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    pub fn lookup(&self, path: &[&str]) -> Option<Value> {
        let head = *path.first()?;
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(head) {
                if let Some(found) = descend(value, &path[1..]) {
                    return Some(found.clone());
                }
            }
        }
        if head == "loop" && !self.frames.is_empty() {
            let frames = self.loop_value(self.frames.len());
            return descend(&frames, &path[1..]).cloned();
        }
        if let Value::Object(map) = self.root {
            if let Some(value) = map.get(head) {
                return descend(value, &path[1..]).cloned();
            }
        }
        None
    }

    /// Writes along a dotted path, creating intermediate objects. The write
    /// lands in the innermost scope that already binds the head segment,
    /// else in the innermost scope; the root data is never mutated.
    pub fn set(&mut self, path: &[&str], value: Value) {
        let head = path[0];
        let target = self
            .scopes
            .iter()
            .rposition(|scope| scope.contains_key(head))
            .unwrap_or(self.scopes.len() - 1);
        set_path(&mut self.scopes[target], path, value);
    }

    fn loop_value(&self, depth: usize) -> Value {
        let frame = &self.frames[depth - 1];
        let mut map = Object::new();
        map.insert("index".to_string(), Value::Int(frame.index as i64));
        map.insert("index1".to_string(), Value::Int(frame.index as i64 + 1));
        map.insert("is_first".to_string(), Value::Bool(frame.is_first()));
        map.insert("is_last".to_string(), Value::Bool(frame.is_last()));
        if depth > 1 {
            map.insert("parent".to_string(), self.loop_value(depth - 1));
        }
        Value::Object(map)
    }
}

fn descend<'v>(mut value: &'v Value, segments: &[&str]) -> Option<&'v Value> {
    for segment in segments {
        match value {
            Value::Object(map) => value = map.get(*segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                value = items.get(index)?;
            }
            _ => return None,
        }
    }
    Some(value)
}

fn set_path(map: &mut Object, path: &[&str], value: Value) {
    if path.len() == 1 {
        map.insert(path[0].to_string(), value);
        return;
    }
    let entry = map
        .entry(path[0].to_string())
        .or_insert_with(|| Value::Object(Object::new()));
    if !matches!(entry, Value::Object(_)) {
        *entry = Value::Object(Object::new());
    }
    if let Value::Object(inner) = entry {
        set_path(inner, &path[1..], value);
    }
}
