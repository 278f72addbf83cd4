//! Sample export data shared by the data tests.

use super::loader::DataLoader;
use polars::prelude::*;

/// Four states in the upstream CSV layout, deliberately not in code order.
///
/// misc. works out to TX 0, CA 20, IA 5, AL 5.
pub const SAMPLE_CSV: &str = "\
code,state,category,total exports,beef,pork,poultry,dairy,fruits fresh,fruits proc,total fruits,veggies fresh,veggies proc,total veggies,corn,wheat,cotton
TX,Texas,state,150,40,5,15,10,2,3,5,6,4,10,20,15,30
CA,California,state,200,20,10,10,40,30,20,50,10,20,30,10,5,5
IA,Iowa,state,90.5,10,40,2,3,0,0,0,0,0,0,30.5,0,0
AL,Alabama,state,100,10,5,0,0,12,8,20,5,10,15,30,10,5
";

pub fn sample_raw() -> DataFrame {
    DataLoader::parse_csv(SAMPLE_CSV.as_bytes().to_vec()).unwrap()
}
