use std::hash::Hash;
use std::marker::PhantomData;

use crate::engine::AstarNode;

/// Priority and accumulated cost of a search node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeCost {
    /// `path_cost` plus the estimate to the goal; the open-set priority.
    pub cost: f32,
    /// Actual cost accumulated from the start.
    pub path_cost: f32,
}

impl NodeCost {
    /// Cost of a start node that has nothing left to estimate.
    pub const ZERO: Self = Self {
        cost: 0.0,
        path_cost: 0.0,
    };

    /// Build a cost from the accumulated path cost and a goal estimate.
    #[inline]
    pub fn new(path_cost: f32, estimate: f32) -> Self {
        Self {
            cost: path_cost + estimate,
            path_cost,
        }
    }
}

/// Graph topology and costing that [`GraphSearch`](crate::GraphSearch)
/// runs over.
///
/// The engine owns the open and closed sets; the space only answers "what
/// is next to this value" and "what does reaching this node cost".
pub trait SearchSpace {
    /// Identity of a graph vertex. Open and closed membership is keyed by it.
    type Value: Clone + Eq + Hash;

    /// Append every value reachable in one step from `value` into `buf`.
    /// The caller clears `buf` before calling.
    fn neighbors(&self, value: &Self::Value, buf: &mut Vec<Self::Value>);

    /// Cost `node`, reached from `previous` (`None` for the start node).
    ///
    /// Returning `None` marks an impossible move: the node is dropped and
    /// never opened. A start node that cannot be costed means no path.
    fn cost_node(
        &self,
        node: &AstarNode<Self::Value>,
        previous: Option<&AstarNode<Self::Value>>,
        goal: &Self::Value,
    ) -> Option<NodeCost>;

    /// Whether `node` terminates the search. Defaults to value equality with
    /// the goal; override for goals like "anywhere within range".
    fn is_end_node(&self, node: &AstarNode<Self::Value>, goal: &Self::Value) -> bool {
        node.value == *goal
    }
}

// ---------------------------------------------------------------------------
// FnSpace
// ---------------------------------------------------------------------------

type ValueIsGoal<V> = fn(&AstarNode<V>, &V) -> bool;

fn value_is_goal<V: PartialEq>(node: &AstarNode<V>, goal: &V) -> bool {
    node.value == *goal
}

/// A [`SearchSpace`] assembled from closures; see [`fn_space`].
pub struct FnSpace<V, N, C, E = ValueIsGoal<V>> {
    neighbors: N,
    cost: C,
    end: E,
    _value: PhantomData<fn() -> V>,
}

/// Build a search space from a neighbour function and a cost function.
///
/// The end test defaults to value equality; replace it with
/// [`FnSpace::with_end`].
pub fn fn_space<V, N, C>(neighbors: N, cost: C) -> FnSpace<V, N, C>
where
    V: Clone + Eq + Hash,
    N: Fn(&V, &mut Vec<V>),
    C: Fn(&AstarNode<V>, Option<&AstarNode<V>>, &V) -> Option<NodeCost>,
{
    FnSpace {
        neighbors,
        cost,
        end: value_is_goal::<V>,
        _value: PhantomData,
    }
}

impl<V, N, C, E> FnSpace<V, N, C, E> {
    /// Replace the end test.
    pub fn with_end<E2>(self, end: E2) -> FnSpace<V, N, C, E2>
    where
        E2: Fn(&AstarNode<V>, &V) -> bool,
    {
        FnSpace {
            neighbors: self.neighbors,
            cost: self.cost,
            end,
            _value: PhantomData,
        }
    }
}

impl<V, N, C, E> SearchSpace for FnSpace<V, N, C, E>
where
    V: Clone + Eq + Hash,
    N: Fn(&V, &mut Vec<V>),
    C: Fn(&AstarNode<V>, Option<&AstarNode<V>>, &V) -> Option<NodeCost>,
    E: Fn(&AstarNode<V>, &V) -> bool,
{
    type Value = V;

    fn neighbors(&self, value: &V, buf: &mut Vec<V>) {
        (self.neighbors)(value, buf)
    }

    fn cost_node(
        &self,
        node: &AstarNode<V>,
        previous: Option<&AstarNode<V>>,
        goal: &V,
    ) -> Option<NodeCost> {
        (self.cost)(node, previous, goal)
    }

    fn is_end_node(&self, node: &AstarNode<V>, goal: &V) -> bool {
        (self.end)(node, goal)
    }
}
