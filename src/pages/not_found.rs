use crate::program::{Dispatch, Effect, Program};
use crate::view::Node;

/// Shown for fragments that match no route.
pub struct NotFoundPage;

impl Program for NotFoundPage {
    type State = ();
    type Msg = ();
    type View = Node;

    fn init(&self) -> ((), Effect<()>) {
        ((), Effect::none())
    }

    fn update(&self, _msg: (), state: ()) -> ((), Effect<()>) {
        (state, Effect::none())
    }

    fn view(&self, _state: &(), _dispatch: &Dispatch<()>) -> Node {
        Node::section("main", vec![Node::heading("Not Found")])
    }

    fn name(&self) -> &'static str {
        "not-found"
    }
}
