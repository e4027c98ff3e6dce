use super::Services;
use crate::program::{Dispatch, Effect, Program};
use crate::routing::Route;
use crate::view::Node;

/// Signs out on mount and returns home.
pub struct LogoutPage {
    services: Services,
}

impl LogoutPage {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Program for LogoutPage {
    type State = ();
    type Msg = ();
    type View = Node;

    fn init(&self) -> ((), Effect<()>) {
        let effect = Effect::batch([
            self.services.remote.sign_out(),
            self.services.router.navigate(Route::Home),
        ]);
        ((), effect)
    }

    fn update(&self, _msg: (), state: ()) -> ((), Effect<()>) {
        (state, Effect::none())
    }

    fn view(&self, _state: &(), _dispatch: &Dispatch<()>) -> Node {
        Node::Empty
    }

    fn name(&self) -> &'static str {
        "logout"
    }
}
