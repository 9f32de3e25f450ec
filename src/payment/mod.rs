pub mod vnpay;
