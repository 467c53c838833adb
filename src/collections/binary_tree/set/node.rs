/// The position of a node within the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(pub usize);

pub(crate) type Link = Option<NodeId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// NOTE: left and right are the owning links, parent is only a way back up for rebalancing. Since
// all three are arena indices, nothing here can dangle as long as the tree relinks nodes when one
// is moved within the arena.

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub value: T,
    pub color: Color,
    pub parent: Link,
    pub left: Link,
    pub right: Link,
}

impl<T> Node<T> {
    pub const fn new_red(value: T, parent: Link) -> Node<T> {
        Node {
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    pub const fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub const fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub const fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }
}
