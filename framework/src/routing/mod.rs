mod group;
mod router;

pub use group::GroupRouter;
pub use router::{
    encode_component, register_route_name, route_with_params, BoxedHandler, RouteBuilder, Router,
};
