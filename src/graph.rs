use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
};

use crossbeam::channel::unbounded;
use itertools::Itertools;
use log::debug;

pub trait Graph {
    type Node: Clone;
    /// Branch order matters: earlier neighbours are explored first.
    fn neighbours(&self, node: &Self::Node) -> Vec<Self::Node>;
    fn check_goal(&self, node: &mut Self::Node) -> GraphControl;
}

pub enum GraphControl {
    Finish,
    Continue,
    Prune,
}

/// Depth-first exploration; returns the goal node and the number of
/// expanded nodes, or the number of expanded nodes on exhaustion.
/// Sibling branches are independent clones, nothing is memoized across
/// them.
pub fn dfs<G: Graph>(graph: G, start: G::Node) -> Result<(G::Node, usize), usize> {
    let mut iterations = 0;
    let mut frontier = vec![start];

    while let Some(mut node) = frontier.pop() {
        iterations += 1;
        match graph.check_goal(&mut node) {
            GraphControl::Finish => {
                return Ok((node, iterations));
            }
            GraphControl::Prune => {}
            GraphControl::Continue => {
                // reversed so the first neighbour is popped next
                frontier.extend(graph.neighbours(&node).into_iter().rev());
            }
        }
    }
    Err(iterations)
}

/// Work queue shared by the search workers. The idle count lives under
/// the same lock as the nodes: a worker holding a popped node has
/// already been taken off the count, so idle == workers can only be
/// observed once the search space is genuinely spent.
struct Frontier<N> {
    nodes: Vec<N>,
    idle: usize,
}

/// Depth-first exploration racing one worker per logical CPU over a
/// shared frontier. The first worker to reach a goal wins and the rest
/// stand down; exhaustion is declared once every worker is idle on an
/// empty frontier.
pub fn dfs_parallel<G>(graph: G, start: G::Node) -> Result<(G::Node, usize), usize>
where
    G: Graph + Clone + Send + 'static,
    G::Node: Send + 'static,
{
    let cpus = num_cpus::get();
    let frontier = Arc::new(Mutex::new(Frontier {
        nodes: vec![start],
        idle: 0,
    }));
    let iterations = Arc::new(AtomicUsize::new(0));
    let done = Arc::new(AtomicBool::new(false));
    let (sender, receiver) = unbounded();

    let workers = (0..cpus)
        .map(|id| {
            let graph = graph.clone();
            let frontier = Arc::clone(&frontier);
            let iterations = Arc::clone(&iterations);
            let done = Arc::clone(&done);
            let sender = sender.clone();
            thread::spawn(move || {
                let mut am_idle = false;
                loop {
                    if done.load(Ordering::SeqCst) {
                        break;
                    }
                    let (popped, exhausted) = {
                        let mut frontier = frontier.lock().unwrap();
                        match frontier.nodes.pop() {
                            Some(node) => {
                                if am_idle {
                                    frontier.idle -= 1;
                                    am_idle = false;
                                }
                                (Some(node), false)
                            }
                            None => {
                                if !am_idle {
                                    frontier.idle += 1;
                                    am_idle = true;
                                }
                                (None, frontier.idle == cpus)
                            }
                        }
                    };
                    let Some(mut node) = popped else {
                        if exhausted && !done.swap(true, Ordering::SeqCst) {
                            debug!("[worker {id}] frontier exhausted");
                            let _ = sender.send(Err(iterations.load(Ordering::SeqCst)));
                        }
                        thread::yield_now();
                        continue;
                    };
                    iterations.fetch_add(1, Ordering::SeqCst);
                    match graph.check_goal(&mut node) {
                        GraphControl::Finish => {
                            if !done.swap(true, Ordering::SeqCst) {
                                debug!("[worker {id}] found a goal");
                                let _ =
                                    sender.send(Ok((node, iterations.load(Ordering::SeqCst))));
                            }
                            break;
                        }
                        GraphControl::Prune => {}
                        GraphControl::Continue => {
                            let neighbours = graph.neighbours(&node);
                            frontier
                                .lock()
                                .unwrap()
                                .nodes
                                .extend(neighbours.into_iter().rev());
                        }
                    }
                }
                debug!("[worker {id}] exiting");
            })
        })
        .collect_vec();

    let result = receiver.recv().unwrap();
    for worker in workers {
        worker.join().unwrap();
    }
    result
}
