pub mod refspec;
