use crate::arena::Handle;

/// A cell of the splay tree. Sets use `V = ()`.
///
/// Links are non-owning arena handles; there is no parent link, so every walk that needs to go
/// back up keeps its own ancestor stack.
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Node {
            key,
            value,
            left: None,
            right: None,
        }
    }

    /// Consumes the node and builds its copy-on-write replacement: same key, same children,
    /// `value` as the payload. The old payload is handed back.
    pub fn replace_value(self, value: V) -> (Self, V) {
        let Node {
            key,
            value: old_value,
            left,
            right,
        } = self;
        (
            Node {
                key,
                value,
                left,
                right,
            },
            old_value,
        )
    }
}
