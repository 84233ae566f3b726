pub mod test_layers;
