mod convert;

pub mod v1 {
    tonic::include_proto!("shortlink.v1");
}
